//! C ABI for hosts that load Chitra as a shared or static library.
//!
//! ```c
//! typedef struct { int32_t width_pix, length_pix; int32_t status; } BpDimensions;
//! typedef struct { float *data; size_t len; int32_t width_pix, length_pix; int32_t status; } BpGrid;
//!
//! BpDimensions bp_get_dim(float x, float y, float width, float length, float resolution);
//! BpGrid bp_get_region(const int32_t *scans, const float *positions,
//!                      int32_t scan_count, int32_t scan_length,
//!                      float bin_start, float bin_end, float bin_size,
//!                      float x, float y, float z,
//!                      float width, float length, float resolution);
//! void bp_free_grid(BpGrid grid);
//! ```
//!
//! `scans` holds `scan_count * scan_length` intensities (scan-major) and
//! `positions` holds `scan_count * 4` floats (`x, y, z, heading`). Both are
//! copied before any work starts and never retained. A grid returned by
//! `bp_get_region` must be released with `bp_free_grid` exactly once; callers
//! that prefer to own the buffer use `bp_get_region_into`.
//!
//! No Rust panic unwinds into the host: a panic is reported as
//! [`BpStatus::Panic`].

use std::ffi::{CStr, c_char};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use parking_lot::RwLock;

use crate::config::{ChitraConfig, KernelConfig};
use crate::core::{AreaOfInterest, BinGeometry, GridDimensions, POSITION_STRIDE, ScanSet};
use crate::error::{Error, Result};
use crate::grid::OutputGrid;
use crate::kernel::ParallelCoordinator;

/// Kernel configuration shared by every FFI call in the process.
static KERNEL_CONFIG: RwLock<Option<KernelConfig>> = RwLock::new(None);

fn current_config() -> KernelConfig {
    KERNEL_CONFIG.read().clone().unwrap_or_default()
}

/// Outcome of an FFI call.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BpStatus {
    /// Success
    Ok = 0,
    /// A required pointer was null
    NullPointer = 1,
    /// Area of interest is unusable
    InvalidGeometry = 2,
    /// Bin geometry is unusable for the scans
    InvalidBinRange = 3,
    /// Counts or buffers are inconsistent
    InvalidInput = 4,
    /// A worker thread failed to start or panicked
    WorkerFailure = 5,
    /// Configuration could not be loaded
    Config = 6,
    /// A panic was caught at the boundary
    Panic = 7,
    /// Caller-provided output buffer is too small
    BufferTooSmall = 8,
}

impl From<&Error> for BpStatus {
    fn from(err: &Error) -> Self {
        match err {
            Error::InvalidGeometry(_) => BpStatus::InvalidGeometry,
            Error::InvalidBinRange(_) => BpStatus::InvalidBinRange,
            Error::InvalidInput(_) => BpStatus::InvalidInput,
            Error::WorkerSpawn(_) | Error::WorkerPanicked(_) => BpStatus::WorkerFailure,
            Error::Config(_) => BpStatus::Config,
        }
    }
}

/// Output grid shape.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BpDimensions {
    /// Columns (x axis)
    pub width_pix: i32,
    /// Rows (y axis)
    pub length_pix: i32,
    /// Call outcome; the pixel counts are 0 unless `Ok`
    pub status: BpStatus,
}

/// Row-major averaged image owned by Chitra until passed to [`bp_free_grid`].
#[repr(C)]
#[derive(Debug)]
pub struct BpGrid {
    /// `len` floats, or null on error
    pub data: *mut f32,
    /// Number of floats at `data`
    pub len: usize,
    /// Columns (x axis)
    pub width_pix: i32,
    /// Rows (y axis)
    pub length_pix: i32,
    /// Call outcome
    pub status: BpStatus,
}

impl BpGrid {
    fn failed(status: BpStatus) -> Self {
        Self {
            data: std::ptr::null_mut(),
            len: 0,
            width_pix: 0,
            length_pix: 0,
            status,
        }
    }

    fn from_output(grid: OutputGrid) -> Self {
        let (width_pix, length_pix) = match pixel_counts(grid.dims()) {
            Ok(counts) => counts,
            Err(status) => return Self::failed(status),
        };
        let data: Box<[f32]> = grid.into_vec().into_boxed_slice();
        let len = data.len();
        Self {
            data: Box::into_raw(data).cast::<f32>(),
            len,
            width_pix,
            length_pix,
            status: BpStatus::Ok,
        }
    }
}

fn pixel_counts(dims: GridDimensions) -> std::result::Result<(i32, i32), BpStatus> {
    match (i32::try_from(dims.width_pix), i32::try_from(dims.length_pix)) {
        (Ok(w), Ok(l)) => Ok((w, l)),
        _ => {
            log::error!(
                "Grid of {}x{} pixels does not fit the C interface",
                dims.width_pix,
                dims.length_pix
            );
            Err(BpStatus::InvalidGeometry)
        }
    }
}

fn status_of(err: &Error) -> BpStatus {
    log::error!("Back-projection failed: {err}");
    BpStatus::from(err)
}

fn count(value: i32, what: &str) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| Error::InvalidInput(format!("{what} must not be negative, got {value}")))
}

/// Copy the host's scan and position buffers into an owned [`ScanSet`].
///
/// # Safety
/// When `scan_count > 0`, `scans` must point to `scan_count * scan_length`
/// readable `i32`s and `positions` to `scan_count * 4` readable `f32`s.
unsafe fn copy_scan_set(
    scans: *const i32,
    positions: *const f32,
    scan_count: i32,
    scan_length: i32,
) -> std::result::Result<ScanSet, BpStatus> {
    let scan_count = count(scan_count, "scan count").map_err(|e| status_of(&e))?;
    let scan_length = count(scan_length, "scan length").map_err(|e| status_of(&e))?;
    if scan_count == 0 {
        return ScanSet::new(Vec::new(), Vec::new(), scan_length).map_err(|e| status_of(&e));
    }
    if scans.is_null() || positions.is_null() {
        log::error!("Null scan or position buffer for {scan_count} scans");
        return Err(BpStatus::NullPointer);
    }

    let (Some(intensity_len), Some(position_len)) = (
        scan_count.checked_mul(scan_length),
        scan_count.checked_mul(POSITION_STRIDE),
    ) else {
        return Err(status_of(&Error::InvalidInput(format!(
            "{scan_count} scans of {scan_length} bins overflow the address space"
        ))));
    };

    // SAFETY: non-null and sized per the caller contract above
    let intensities = unsafe { std::slice::from_raw_parts(scans, intensity_len) }.to_vec();
    let positions = unsafe { std::slice::from_raw_parts(positions, position_len) };
    ScanSet::from_flat(intensities, positions, scan_count, scan_length).map_err(|e| status_of(&e))
}

/// Run `body`, turning a panic into [`BpStatus::Panic`].
fn guarded<T>(
    body: impl FnOnce() -> std::result::Result<T, BpStatus>,
) -> std::result::Result<T, BpStatus> {
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(result) => result,
        Err(_) => {
            log::error!("Panic caught at the C boundary");
            Err(BpStatus::Panic)
        }
    }
}

/// Output grid shape for an area of interest, using the configured
/// indexing convention.
#[unsafe(no_mangle)]
pub extern "C" fn bp_get_dim(
    x: f32,
    y: f32,
    width: f32,
    length: f32,
    resolution: f32,
) -> BpDimensions {
    let result = guarded(|| {
        let dims = AreaOfInterest::new(x, y, width, length, resolution)
            .dimensions_for(current_config().indexing)
            .map_err(|e| status_of(&e))?;
        pixel_counts(dims)
    });

    match result {
        Ok((width_pix, length_pix)) => BpDimensions {
            width_pix,
            length_pix,
            status: BpStatus::Ok,
        },
        Err(status) => BpDimensions {
            width_pix: 0,
            length_pix: 0,
            status,
        },
    }
}

/// Back-project and return a grid to be released with [`bp_free_grid`].
///
/// # Safety
/// `scans` and `positions` must satisfy the buffer contract in the module
/// docs. They may be null only when `scan_count == 0`.
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn bp_get_region(
    scans: *const i32,
    positions: *const f32,
    scan_count: i32,
    scan_length: i32,
    bin_start: f32,
    bin_end: f32,
    bin_size: f32,
    x: f32,
    y: f32,
    z: f32,
    width: f32,
    length: f32,
    resolution: f32,
) -> BpGrid {
    let result = guarded(|| {
        // SAFETY: forwarded caller contract
        let scan_set = unsafe { copy_scan_set(scans, positions, scan_count, scan_length) }?;
        let bins = BinGeometry::new(bin_start, bin_end, bin_size);
        let area = AreaOfInterest::new(x, y, width, length, resolution);
        ParallelCoordinator::new(current_config())
            .run(&scan_set, &bins, &area, z)
            .map_err(|e| status_of(&e))
    });

    match result {
        Ok(grid) => BpGrid::from_output(grid),
        Err(status) => BpGrid::failed(status),
    }
}

/// Back-project into a caller-owned buffer of `out_len` floats.
///
/// The required length is `width_pix * length_pix` from [`bp_get_dim`].
///
/// # Safety
/// As [`bp_get_region`]; additionally `out` must point to `out_len`
/// writable `f32`s.
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn bp_get_region_into(
    scans: *const i32,
    positions: *const f32,
    scan_count: i32,
    scan_length: i32,
    bin_start: f32,
    bin_end: f32,
    bin_size: f32,
    x: f32,
    y: f32,
    z: f32,
    width: f32,
    length: f32,
    resolution: f32,
    out: *mut f32,
    out_len: usize,
) -> BpStatus {
    let result = guarded(|| {
        if out.is_null() {
            log::error!("Null output buffer");
            return Err(BpStatus::NullPointer);
        }
        let config = current_config();
        let area = AreaOfInterest::new(x, y, width, length, resolution);
        let dims = area
            .dimensions_for(config.indexing)
            .map_err(|e| status_of(&e))?;
        if out_len < dims.cell_count() {
            log::error!(
                "Output buffer holds {} floats but the grid needs {}",
                out_len,
                dims.cell_count()
            );
            return Err(BpStatus::BufferTooSmall);
        }

        // SAFETY: forwarded caller contract
        let scan_set = unsafe { copy_scan_set(scans, positions, scan_count, scan_length) }?;
        let bins = BinGeometry::new(bin_start, bin_end, bin_size);
        let grid = ParallelCoordinator::new(config)
            .run(&scan_set, &bins, &area, z)
            .map_err(|e| status_of(&e))?;

        let data = grid.as_slice();
        // SAFETY: `out` holds at least `cell_count` floats, checked above
        let out = unsafe { std::slice::from_raw_parts_mut(out, data.len()) };
        out.copy_from_slice(data);
        Ok(())
    });

    match result {
        Ok(()) => BpStatus::Ok,
        Err(status) => status,
    }
}

/// Release a grid returned by [`bp_get_region`]. A null `data` is ignored.
///
/// # Safety
/// `grid` must come from [`bp_get_region`] unmodified and must not have been
/// freed before.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bp_free_grid(grid: BpGrid) {
    if grid.data.is_null() {
        return;
    }
    // SAFETY: `data`/`len` were produced by `Box::into_raw` in `BpGrid::from_output`
    drop(unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(grid.data, grid.len)) });
}

/// Fix the worker count for subsequent calls; `n <= 0` restores the default
/// derived from the host's parallelism.
#[unsafe(no_mangle)]
pub extern "C" fn bp_set_worker_count(n: i32) {
    let mut guard = KERNEL_CONFIG.write();
    let config = guard.get_or_insert_with(KernelConfig::default);
    config.workers = usize::try_from(n).ok().filter(|&n| n > 0);
    log::info!("Worker count set to {}", config.worker_count());
}

/// Load the `[kernel]` section of a TOML file for subsequent calls.
///
/// # Safety
/// `path` must be null or a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bp_load_config(path: *const c_char) -> BpStatus {
    if path.is_null() {
        return BpStatus::NullPointer;
    }
    // SAFETY: non-null, NUL-terminated per the caller contract
    let path = unsafe { CStr::from_ptr(path) };
    let Ok(path) = path.to_str() else {
        log::error!("Config path is not valid UTF-8");
        return BpStatus::InvalidInput;
    };

    match ChitraConfig::load(Path::new(path)) {
        Ok(config) => {
            log::info!("Loaded kernel config from {path}");
            *KERNEL_CONFIG.write() = Some(config.kernel);
            BpStatus::Ok
        }
        Err(e) => status_of(&Error::from(e)),
    }
}

/// Install an `env_logger` logger (`RUST_LOG`, default `info`). Calling it
/// again is a no-op.
#[unsafe(no_mangle)]
pub extern "C" fn bp_init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init()
        .ok();
}
