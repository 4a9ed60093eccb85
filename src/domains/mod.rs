pub mod edi;
pub mod resolutions;
