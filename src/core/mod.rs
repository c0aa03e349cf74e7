//! Stateless services that turn ledger snapshots into budget insights.

pub mod services;
