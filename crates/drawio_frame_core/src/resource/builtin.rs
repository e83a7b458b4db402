//! Resources compiled into the crate.

use crate::resource::registry::{RegistryBuilder, ResourceRegistry};
use log::error;
use once_cell::sync::Lazy;

/// Bundle path of the frame stylesheet loaded during bootstrap.
pub const DRAWIO_STYLESHEET: &str = "drawio.css";
/// Bundle path of the diagram icon referenced by the frame stylesheet.
pub const DIAGRAM_ICON: &str = "images/diagram-icon.svg";
/// Bundle path of the blank diagram used for new files.
pub const EMPTY_DIAGRAM: &str = "templates/empty-diagram.svg";

const BUILTIN_RESOURCES: &[(&str, &[u8])] = &[
    (
        DRAWIO_STYLESHEET,
        include_bytes!("../../assets/drawio.css"),
    ),
    (
        DIAGRAM_ICON,
        include_bytes!("../../assets/images/diagram-icon.svg"),
    ),
    (
        EMPTY_DIAGRAM,
        include_bytes!("../../assets/templates/empty-diagram.svg"),
    ),
];

static BUILTIN_REGISTRY: Lazy<ResourceRegistry> = Lazy::new(|| {
    let mut builder = RegistryBuilder::new();
    for (path, content) in BUILTIN_RESOURCES {
        if let Err(err) = builder.register_inferred(path, *content) {
            error!(
                "event=builtin_register module=resource status=error path={} error={}",
                path, err
            );
        }
    }
    builder.build()
});

/// Registry holding the compiled-in resources. Clones are cheap.
pub fn builtin_registry() -> ResourceRegistry {
    BUILTIN_REGISTRY.clone()
}
