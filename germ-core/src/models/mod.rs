pub mod annotated;
pub mod interval;
pub mod locus;

// re-export for cleaner imports
pub use self::annotated::Annotated;
pub use self::interval::Interval;
pub use self::locus::Locus;
