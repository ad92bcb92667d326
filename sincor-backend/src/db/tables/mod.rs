//! Database table modules - extend Database with table-specific methods

mod tasks; // tasks (the task record ledger)
