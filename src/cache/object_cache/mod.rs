pub mod moka;
