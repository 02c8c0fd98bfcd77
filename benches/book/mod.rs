pub mod mixed_workload;
pub mod thin_book_sweep;
