//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::{Idx2d, Idx3d};

pub use crate::consts::gray::{BACKGROUND, FOREGROUND};
pub use crate::consts::ElemType;
pub use crate::error::{VoxError, VoxResult};

pub use crate::data::{BinaryGridView, BinarySliceMut, BitMarker, VoxelBox, VoxelMarker};

pub use crate::label::{label_2d, label_3d, Connectivity2d, Connectivity3d, LabelMap, LabelStats};

pub use crate::fill::{flood_fill_2d, flood_fill_3d, grow_region, FillReport, GrownRegion};

pub use crate::morph::{close, dilate, dilate_2d, erode, erode_2d, open, StructuringElement};

pub use crate::distance::signed_distance_2d;

pub use crate::interp::{interpolate_slices, labeled_slices, InterpolationMode};

#[cfg(feature = "rayon")]
pub use crate::batch::{par_label_slices, par_signed_distance_slices};
