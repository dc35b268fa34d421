//! Colloscope: a constraint model and symmetric analyzer for fortnight-style
//! oral-examination timetables ("colles").
//!
//! [`gen`] holds the core: the Input Normalizer, Window Partitioner,
//! Alternation Policy, Constraint Model Builder, Solver Driver, Assignment
//! Materializer, Analyzer and Rotational Extender described by the
//! specification this crate implements. [`ilp`] is the small 0/1 integer
//! linear programming layer the builder posts constraints against. [`time`]
//! is the minute-resolution time-of-day type shared by the catalog and the
//! constraint model. [`cli`] wires the core up as a command-line tool.

pub mod cli;
pub mod gen;
pub mod ilp;
pub mod time;
