//! Construction of one model process invocation.

use std::path::{Path, PathBuf};

use aether_core::{DensityQuery, ScenarioWindow};

use crate::conversion::ModelCoordinates;

/// Number of positional arguments the model receives after the script path.
pub const ARGUMENT_COUNT: usize = 6;

/// A fully-built model process invocation.
///
/// The model contract is positional. After the script path it reads, in
/// order: epoch, altitude (km), latitude (deg), longitude (deg, `[0, 360)`),
/// scenario start, scenario stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInvocation {
    executable: PathBuf,
    script: PathBuf,
    arguments: Vec<String>,
}

impl ModelInvocation {
    /// Build the invocation for `query` within `window`.
    #[must_use]
    pub fn build(
        executable: impl Into<PathBuf>,
        script: impl Into<PathBuf>,
        query: &DensityQuery,
        window: &ScenarioWindow,
    ) -> Self {
        let coords = ModelCoordinates::from_query(query);
        let arguments = vec![
            query.epoch.clone(),
            coords.altitude_km.to_string(),
            coords.latitude_deg.to_string(),
            coords.longitude_deg.to_string(),
            window.start.clone(),
            window.stop.clone(),
        ];

        Self {
            executable: executable.into(),
            script: script.into(),
            arguments,
        }
    }

    /// The interpreter to spawn.
    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// The model script, passed as the first argument.
    #[must_use]
    pub fn script(&self) -> &Path {
        &self.script
    }

    /// Positional arguments following the script path.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Full argv after the executable: script path then arguments.
    pub fn argv(&self) -> impl Iterator<Item = &std::ffi::OsStr> {
        std::iter::once(self.script.as_os_str())
            .chain(self.arguments.iter().map(std::ffi::OsStr::new))
    }

    /// Space-joined form of the argument string, for logs.
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut line = self.script.display().to_string();
        for arg in &self.arguments {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation() -> ModelInvocation {
        ModelInvocation::build(
            "/usr/bin/python3",
            "/opt/wam/read_density.py",
            &DensityQuery::new("1440", 0.0, 0.0, 400_000.0),
            &ScenarioWindow::new("2024-05-10T00:00:00", "2024-05-12T00:00:00"),
        )
    }

    #[test]
    fn test_argument_order_and_count() {
        let inv = invocation();
        assert_eq!(inv.arguments().len(), ARGUMENT_COUNT);
        assert_eq!(
            inv.arguments(),
            [
                "1440",
                "400",
                "0",
                "180",
                "2024-05-10T00:00:00",
                "2024-05-12T00:00:00",
            ]
        );
    }

    #[test]
    fn test_argv_starts_with_script() {
        let inv = invocation();
        let argv: Vec<_> = inv.argv().collect();
        assert_eq!(argv.len(), ARGUMENT_COUNT + 1);
        assert_eq!(argv[0], "/opt/wam/read_density.py");
        assert_eq!(argv[1], "1440");
    }

    #[test]
    fn test_command_line() {
        assert_eq!(
            invocation().command_line(),
            "/opt/wam/read_density.py 1440 400 0 180 2024-05-10T00:00:00 2024-05-12T00:00:00"
        );
    }

    #[test]
    fn test_fractional_values_render_shortest() {
        let inv = ModelInvocation::build(
            "python3",
            "model.py",
            &DensityQuery::new("12.5", 0.0, 0.0, 123_456.0),
            &ScenarioWindow::new("a", "b"),
        );
        assert_eq!(inv.arguments()[1], "123.456");
    }

    #[test]
    fn test_window_passed_through_unmodified() {
        let inv = ModelInvocation::build(
            "python3",
            "model.py",
            &DensityQuery::new("0", 0.0, 0.0, 0.0),
            &ScenarioWindow::new("10 May 2024 00:00:00.000", "not a date"),
        );
        assert_eq!(inv.arguments()[4], "10 May 2024 00:00:00.000");
        assert_eq!(inv.arguments()[5], "not a date");
    }
}
