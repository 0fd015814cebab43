use foodie_error::Error;

use crate::server::LoadConfigError;

// We need to dissect the error of figment so that we can get
// more info on why the configuration fails to parse (from a file
// or environment variables)
pub(crate) fn attach_figment_error(
    mut error: Error<LoadConfigError>,
    figment_error: figment::Error,
) -> Error<LoadConfigError> {
    for e in figment_error {
        error = error.attach_printable(e.kind.to_string());

        if let (Some(profile), Some(md)) = (&e.profile, &e.metadata) {
            if !e.path.is_empty() {
                let key = md.interpolate(profile, &e.path);
                error = error.attach_printable(format!("for key {key:?}"));
            }
        }

        if let Some(md) = &e.metadata {
            if let Some(source) = &md.source {
                error = error.attach_printable(format!("in {source} {}", md.name));
            } else {
                error = error.attach_printable(format!("in {}", md.name));
            }
        }
    }
    error
}
