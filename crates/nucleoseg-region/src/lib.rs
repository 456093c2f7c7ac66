//! nucleoseg-region - Region processing
//!
//! This crate provides region processing functionality including:
//!
//! - **Connected component analysis** - Labeling 4- or 8-connected regions
//! - **Seed fill operations** - Hole filling
//! - **Label-map utilities** - Relabeling, size filters, border clearing
//! - **Distance transform** - Exact Euclidean distance to background
//! - **Watershed segmentation** - Marker-based flooding to split touching objects
//! - **Region properties** - Shape and intensity measurements
//!
//! # Examples
//!
//! ## Labeling a mask
//!
//! ```
//! use nucleoseg_core::Mask;
//! use nucleoseg_region::{ConnectivityType, label_connected_components};
//!
//! let mask = Mask::from_fn(10, 10, |x, y| (x == 2 && y == 2) || (x == 7 && y == 7)).unwrap();
//! let labels = label_connected_components(&mask, ConnectivityType::EightWay).unwrap();
//! assert_eq!(labels.num_regions(), 2);
//! ```
//!
//! ## Cleaning up a candidate mask
//!
//! ```
//! use nucleoseg_core::Mask;
//! use nucleoseg_region::segment_binary;
//!
//! // A 4x4 block in the middle and a speck in the corner
//! let mask = Mask::from_fn(12, 12, |x, y| {
//!     ((4..8).contains(&x) && (4..8).contains(&y)) || (x == 0 && y == 0)
//! })
//! .unwrap();
//! let labels = segment_binary(&mask, 5).unwrap();
//! assert_eq!(labels.num_regions(), 1);
//! ```

pub mod conncomp;
pub mod distance;
pub mod error;
pub mod label;
pub mod props;
pub mod seedfill;
pub mod watershed;

// Re-export error types
pub use error::{RegionError, RegionResult};

pub use conncomp::{ConnectivityType, label_connected_components};
pub use distance::distance_transform;
pub use label::{
    clear_border_labels, region_areas, relabel_sequential, remove_oversized_regions,
    remove_small_regions, segment_binary,
};
pub use props::{RegionProps, region_props};
pub use seedfill::fill_holes;
pub use watershed::{
    WatershedOptions, find_local_maxima, markers_from_maxima, watershed_from_markers,
};
