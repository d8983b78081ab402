pub mod opener;
