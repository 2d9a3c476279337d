mod aggregate;

pub use aggregate::summarize;
