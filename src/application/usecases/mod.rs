pub mod run_sweep;
