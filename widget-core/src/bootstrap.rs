//! Per-container initialization, independent of the DOM. The loader supplies a
//! [`WidgetMount`] that talks to the real renderer; failures stay with the
//! container that produced them.

use crate::attributes::{WidgetConfig, WidgetContainerDescriptor};
use crate::{EnvironmentContext, LoaderConfig, WidgetError};

/// Mounts one widget. Implemented by the loader over `renderWidget`.
pub trait WidgetMount {
    fn mount(
        &mut self,
        index: usize,
        descriptor: &WidgetContainerDescriptor,
        config: &WidgetConfig,
    ) -> Result<(), WidgetError>;
}

/// Outcome for one scanned container, in scan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountOutcome {
    Mounted { widget_id: String },
    Failed { index: usize, error: WidgetError },
}

impl MountOutcome {
    pub fn is_mounted(&self) -> bool {
        matches!(self, MountOutcome::Mounted { .. })
    }
}

/// Builds a descriptor and config for every container and mounts each one.
/// `containers` holds each container's attributes in document order; the
/// `n`-th one gets ordinal `first_ordinal + n`. Outcome indexes are positions
/// in `containers`.
pub fn mount_all<M: WidgetMount>(
    containers: Vec<Vec<(String, String)>>,
    first_ordinal: usize,
    env: &EnvironmentContext,
    config: &LoaderConfig,
    mounter: &mut M,
) -> Vec<MountOutcome> {
    containers
        .into_iter()
        .enumerate()
        .map(|(index, attributes)| {
            let result = WidgetContainerDescriptor::new(first_ordinal + index, attributes)
                .and_then(|descriptor| {
                    let widget_config =
                        descriptor.config(&config.data_prefix, &env.api_base_url);
                    mounter
                        .mount(index, &descriptor, &widget_config)
                        .map(|()| descriptor.widget_id)
                });
            match result {
                Ok(widget_id) => MountOutcome::Mounted { widget_id },
                Err(error) => MountOutcome::Failed { index, error },
            }
        })
        .collect()
}

/// Text written into a container whose widget could not be initialized.
pub fn inline_error_text(error: &WidgetError) -> String {
    format!("Error loading widget: {error}")
}
