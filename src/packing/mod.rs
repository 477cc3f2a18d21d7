mod frames;
mod maxrects;
mod packer;
mod sheet;

pub use frames::{FrameManifest, FrameRect, FrameSize, PlacementFrame, SheetMeta};
pub use maxrects::MaxRectsPacker;
pub use packer::{PackSettings, PackedSheet, Packer, SheetPacker};
pub use sheet::save_sheet_image;
