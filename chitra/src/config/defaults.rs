//! Default value functions for serde deserialization.

pub fn reserved_threads() -> usize {
    2
}

pub fn bins_per_axis() -> usize {
    80
}

pub fn extent_min() -> f32 {
    -5.0
}

pub fn extent_max() -> f32 {
    5.0
}

pub fn limit_per_bin() -> u32 {
    1
}
