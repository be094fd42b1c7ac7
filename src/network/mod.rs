pub mod packet;
pub mod capture;
pub mod decode;

pub use capture::PacketCapture;
