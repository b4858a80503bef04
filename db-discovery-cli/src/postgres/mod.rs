//! PostgreSQL side: connections, type inference, table loading and dropping
//!
//! Every public operation catches its own errors, prints a message and
//! returns `false`/`None`/an empty dataset, so one failing table never stops
//! the rest of a run.
//!
//! Table and column names are interpolated into SQL text (the table name in
//! double quotes, columns bare). They come from the fixed dataset list and
//! the bundled files, never from user input, so they are not escaped. Row
//! values are always bound as parameters.

pub mod connection;
pub mod drop;
pub mod loader;
pub mod query;
pub mod types;

pub use connection::{close, connect, is_alive, server_version};
pub use drop::drop_table;
pub use loader::load_dataset;
pub use query::query_to_dataset;
