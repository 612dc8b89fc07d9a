use std::sync::Arc;

use crate::adapters::{FfmpegConcatAdapter, FfprobeAdapter, FsScannerAdapter};
use crate::app::{
    batch_interactor::BatchInteractor,
    merge_interactor::{MergeInteractor, MergeSettings},
};
use crate::config_initialization::RunSettings;
use crate::output::ArtifactWriter;
use crate::ports::{LogPort, MergePort, ProbePort, ScanPort};

pub trait AppContainer: Send + Sync {
    fn merge_interactor(&self) -> Arc<MergeInteractor>;
    fn batch_interactor(&self) -> Arc<BatchInteractor>;
}

pub struct DefaultAppContainer {
    merge_interactor: Arc<MergeInteractor>,
    batch_interactor: Arc<BatchInteractor>,
}

impl DefaultAppContainer {
    pub fn new(settings: &RunSettings, log_port: Arc<dyn LogPort>) -> Self {
        let tools = &settings.config.tools;
        let probe_port =
            Arc::new(FfprobeAdapter::new(tools.ffprobe.as_str()).with_timeout(settings.timeout));
        let merge_port = Arc::new(
            FfmpegConcatAdapter::new(tools.ffmpeg.as_str()).with_timeout(settings.timeout),
        );
        let scan_port = Arc::new(FsScannerAdapter::new(
            settings.config.merge.video_extensions.iter(),
        ));

        let merge_interactor = Arc::new(MergeInteractor::new(
            probe_port as Arc<dyn ProbePort>,
            merge_port as Arc<dyn MergePort>,
            Arc::clone(&log_port),
            ArtifactWriter::new(&settings.diagnostics_dir),
            MergeSettings {
                output_dir: settings.output_dir.clone(),
                tolerance: settings.tolerance(),
                manifest_dir: None,
            },
        ));

        let batch_interactor = Arc::new(BatchInteractor::new(
            scan_port as Arc<dyn ScanPort>,
            Arc::clone(&merge_interactor),
            log_port,
        ));

        Self {
            merge_interactor,
            batch_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn merge_interactor(&self) -> Arc<MergeInteractor> {
        Arc::clone(&self.merge_interactor)
    }

    fn batch_interactor(&self) -> Arc<BatchInteractor> {
        Arc::clone(&self.batch_interactor)
    }
}
