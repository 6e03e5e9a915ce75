mod datasets;
mod mineral;
mod service;

pub use self::datasets::{
    dataset_ids, datasets, image_logs, mosaic_logs, profilometer_logs, scalar_logs,
    spectral_logs, tray_depths, Dataset, ImageLog, MosaicFilter, MosaicLog, ProfilometerLog,
    ScalarLog, SpectralLog, TrayDepth,
};
pub use self::mineral::{bgr_to_rgba, dominant_classes, DepthClass};
pub use self::service::{
    DownsampleOptions, MosaicOptions, NvclService, PlotOptions, MAX_PLOTTED_LOGS,
};
