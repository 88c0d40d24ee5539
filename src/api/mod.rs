pub mod bithomp;
