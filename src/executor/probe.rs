use super::results::Outcome;
use crate::{
    errors::{PicarError, ProbeError},
    probes::{self, Env},
};
use log::info;

/// One hardware subsystem check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Probe {
    Chassis,
    Camera,
    Audio,
    Servo,
}

impl Probe {
    /// Every probe, in execution order.
    pub const ALL: [Probe; 4] =
        [Probe::Chassis, Probe::Camera, Probe::Audio, Probe::Servo];

    /// Name shown in the summary.
    pub fn name(self) -> &'static str {
        match self {
            Probe::Chassis => "Basic Functionality",
            Probe::Camera => "Camera",
            Probe::Audio => "Audio/TTS",
            Probe::Servo => "Servo Control",
        }
    }

    /// Short name accepted by the `--include` and `--exclude` filters.
    pub fn key(self) -> &'static str {
        match self {
            Probe::Chassis => "chassis",
            Probe::Camera => "camera",
            Probe::Audio => "audio",
            Probe::Servo => "servo",
        }
    }

    /// What running the probe will do to the car.
    pub fn touches(self) -> &'static str {
        match self {
            Probe::Chassis => "drives both rear motors forward briefly",
            Probe::Camera => "grabs one frame from the first working camera",
            Probe::Audio => "speaks a test phrase",
            Probe::Servo => "centres the pan, tilt and steering servos",
        }
    }

    /// Run the probe. Hardware failures become a failed [Outcome] plus a
    /// diagnostic; only a broken console is an error.
    pub async fn execute(self, env: &mut Env<'_>) -> Result<Outcome, PicarError> {
        let res = match self {
            Probe::Chassis => probes::chassis::run(env).await,
            Probe::Camera => probes::camera::run(env).await,
            Probe::Audio => probes::audio::run(env).await,
            Probe::Servo => probes::servo::run(env).await,
        };
        match res {
            Ok(()) => Ok(Outcome::new(self.name(), true)),
            Err(err) => {
                info!("{} failed: {:?}", self.key(), err);
                let (msg, hint) = self.explain(&err);
                env.printer.fail(msg)?;
                if let Some(hint) = hint {
                    env.printer.line(hint)?;
                }
                Ok(Outcome::new(self.name(), false))
            }
        }
    }

    /// Diagnostic line and follow-up hint for a failure.
    fn explain(self, err: &ProbeError) -> (String, Option<&'static str>) {
        use ProbeError::{Fault, Unavailable};
        match (self, err) {
            (Probe::Chassis, Unavailable(d)) => (
                format!("Driver unavailable: {}", d),
                Some("Please ensure all drivers are installed correctly."),
            ),
            (Probe::Chassis, Fault(d)) => (
                format!("Basic test error: {}", d),
                Some("Please check your PiCar-X setup and connections."),
            ),
            (Probe::Camera, Unavailable(d)) => (
                format!("Camera test - driver unavailable: {}", d),
                Some("Video capture tools may not be installed or camera drivers missing"),
            ),
            (Probe::Camera, Fault(d)) => (d.clone(), None),
            (Probe::Audio, Unavailable(d)) => (
                format!("Audio test - driver unavailable: {}", d),
                Some("TTS engine may not be installed"),
            ),
            (Probe::Audio, Fault(d)) => (
                format!("Audio test error: {}", d),
                Some("Audio system may not be properly configured"),
            ),
            (Probe::Servo, err) => (
                format!("Servo test error: {}", err),
                Some("Servo hardware may not be connected or calibrated"),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_drivers_get_install_hints() {
        let err = ProbeError::Unavailable("no /dev/i2c-1".to_string());
        let (msg, hint) = Probe::Chassis.explain(&err);
        assert_eq!(msg, "Driver unavailable: no /dev/i2c-1");
        assert!(hint.unwrap().contains("installed"));
    }

    #[test]
    fn servo_failures_are_not_split() {
        let missing = ProbeError::Unavailable("x".to_string());
        let fault = ProbeError::Fault("x".to_string());
        assert_eq!(
            Probe::Servo.explain(&missing),
            Probe::Servo.explain(&fault)
        );
    }

    #[test]
    fn camera_faults_are_printed_verbatim() {
        let err = ProbeError::Fault("No working camera found".to_string());
        assert_eq!(
            Probe::Camera.explain(&err),
            ("No working camera found".to_string(), None)
        );
    }
}
