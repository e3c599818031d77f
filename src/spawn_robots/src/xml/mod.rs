//! XML launch file output

pub mod writer;

pub use writer::to_launch_xml;
