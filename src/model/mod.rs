pub mod assays;
pub mod facility;
pub mod material;
pub mod pools;
pub mod tracker;
