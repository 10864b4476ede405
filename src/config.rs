//! Configuration read from a `picar.toml` file.
//!
//! Every section and key is optional; the defaults describe a stock PiCar-X
//! on a Raspberry Pi running the usual camera and speech tools.
use crate::{errors::PicarError, hat::pwm, shell::Tool};
use log::info;
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "picar.toml";

/// Configuration for a single picar-check run.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Version of picar-check this configuration is written for.
    pub ver: Option<String>,
    pub hat: HatConfig,
    pub chassis: ChassisConfig,
    pub camera: CameraConfig,
    pub audio: AudioConfig,
    pub servo: ServoConfig,
}

/// Robot HAT wiring.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HatConfig {
    pub i2c_bus: u8,
    /// Candidate MCU addresses, tried in order.
    pub addresses: Vec<u16>,
    /// BCM pin wired to the MCU reset line.
    pub reset_pin: u8,
    /// BCM pins for the left and right motor direction.
    pub motor_dir_pins: [u8; 2],
    /// PWM channels for the left and right motor speed.
    pub motor_pwm_channels: [u8; 2],
    /// `1` or `-1` per motor.
    pub motor_calibration: [i8; 2],
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChassisConfig {
    /// Forward speed in percent.
    pub speed: u8,
    pub drive_ms: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    /// Device nodes or glob patterns, tried in order.
    pub devices: Vec<String>,
    /// Grabs one frame from `{}` and writes it to stdout.
    pub capture: Tool,
    /// Prints the current video format of `{}`.
    pub format: Tool,
    /// Fall back to the Pi camera module when no device captures.
    pub pi_camera: bool,
    /// Runs the Pi camera for `{}` milliseconds.
    pub pi_preview: Tool,
    pub settle_ms: u64,
    pub timeout_s: u64,
}

/// Speech engines with a built-in command.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Espeak,
    Pico2wave,
}

impl Engine {
    pub fn name(self) -> &'static str {
        match self {
            Engine::Espeak => "espeak",
            Engine::Pico2wave => "pico2wave",
        }
    }

    /// Command speaking `{}` through the default ALSA device.
    pub fn tool(self) -> Tool {
        match self {
            Engine::Espeak => Tool::new(
                "espeak -a100 -s175 -g5 -p50 {} --stdout | aplay -q",
                &["espeak", "aplay"],
            ),
            Engine::Pico2wave => Tool::new(
                "pico2wave -l en-US -w /tmp/picar-check-tts.wav {} \
                 && aplay -q /tmp/picar-check-tts.wav",
                &["pico2wave", "aplay"],
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioConfig {
    pub engine: Engine,
    pub phrase: String,
    /// Replaces the engine's built-in command.
    pub say: Option<Tool>,
    pub settle_ms: u64,
    pub timeout_s: u64,
}

impl AudioConfig {
    pub fn tool(&self) -> Tool {
        self.say.clone().unwrap_or_else(|| self.engine.tool())
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServoConfig {
    pub pan_channel: u8,
    pub tilt_channel: u8,
    pub steering_channel: u8,
    /// Target angle for every servo, in degrees.
    pub angle: i16,
    pub settle_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ver: None,
            hat: HatConfig::default(),
            chassis: ChassisConfig::default(),
            camera: CameraConfig::default(),
            audio: AudioConfig::default(),
            servo: ServoConfig::default(),
        }
    }
}

impl Default for HatConfig {
    fn default() -> Self {
        Self {
            i2c_bus: 1,
            addresses: vec![0x14, 0x15, 0x16],
            reset_pin: 5,
            motor_dir_pins: [23, 24],
            motor_pwm_channels: [13, 12],
            motor_calibration: [1, 1],
        }
    }
}

impl Default for ChassisConfig {
    fn default() -> Self {
        Self {
            speed: 10,
            drive_ms: 500,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            devices: vec!["/dev/video0".to_string(), "/dev/video1".to_string()],
            capture: Tool::new(
                "v4l2-ctl --device={} --stream-mmap --stream-count=1 --stream-to=-",
                &["v4l2-ctl"],
            ),
            format: Tool::new(
                "v4l2-ctl --device={} --get-fmt-video",
                &["v4l2-ctl"],
            ),
            pi_camera: true,
            pi_preview: Tool::new(
                "rpicam-hello --nopreview --timeout {}",
                &["rpicam-hello"],
            ),
            settle_ms: 1000,
            timeout_s: 10,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            engine: Engine::Espeak,
            phrase: "PiCar-X test".to_string(),
            say: None,
            settle_ms: 1000,
            timeout_s: 10,
        }
    }
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            pan_channel: 0,
            tilt_channel: 1,
            steering_channel: 2,
            angle: 0,
            settle_ms: 500,
        }
    }
}

impl ChassisConfig {
    pub fn drive_time(&self) -> Duration {
        Duration::from_millis(self.drive_ms)
    }
}

impl CameraConfig {
    pub fn settle_time(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_s)
    }
}

impl AudioConfig {
    pub fn settle_time(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_s)
    }
}

impl ServoConfig {
    pub fn settle_time(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl Config {
    /// Use the explicit path if one was given, otherwise `picar.toml` in the
    /// working directory if it exists, otherwise the defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, PicarError> {
        match explicit {
            Some(path) => Self::from_path(path),
            None => {
                let local = PathBuf::from(CONFIG_FILE);
                if local.exists() {
                    Self::from_path(&local)
                } else {
                    info!("no {} found, using defaults", CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    /// Read and validate a configuration file.
    pub fn from_path(conf_path: &Path) -> Result<Self, PicarError> {
        let contents = std::fs::read_to_string(conf_path).map_err(|err| {
            PicarError(format!(
                "Failed to read {}: {}",
                conf_path.display(),
                err
            ))
        })?;
        info!("reading configuration from {}", conf_path.display());
        Self::parse(&contents).map_err(|PicarError(msg)| {
            PicarError(format!("{}: {}", conf_path.display(), msg))
        })
    }

    /// Parse and validate configuration text.
    pub fn parse(contents: &str) -> Result<Self, PicarError> {
        let conf: Config = toml::from_str(contents)
            .map_err(|err| PicarError(format!("Failed to parse: {}", err)))?;
        conf.validate()?;
        Ok(conf)
    }

    fn validate(&self) -> Result<(), PicarError> {
        if let Some(ver) = &self.ver {
            if ver != env!("CARGO_PKG_VERSION") {
                return Err(PicarError(format!(
                    "version mismatch. Configuration requires: {}, tool version: {}.",
                    ver,
                    env!("CARGO_PKG_VERSION")
                )));
            }
        }
        if self.hat.addresses.is_empty() {
            return Err(PicarError("hat.addresses is empty".to_string()));
        }
        let channels = self
            .hat
            .motor_pwm_channels
            .iter()
            .chain(&[
                self.servo.pan_channel,
                self.servo.tilt_channel,
                self.servo.steering_channel,
            ])
            .copied()
            .collect::<Vec<_>>();
        if let Some(bad) = channels.iter().find(|c| **c > pwm::MAX_CHANNEL) {
            return Err(PicarError(format!(
                "PWM channel P{} does not exist (P0-P{})",
                bad,
                pwm::MAX_CHANNEL
            )));
        }
        let motor_timers = self
            .hat
            .motor_pwm_channels
            .iter()
            .map(|c| pwm::timer_of(*c))
            .collect::<Vec<_>>();
        let servos = [
            ("pan", self.servo.pan_channel),
            ("tilt", self.servo.tilt_channel),
            ("steering", self.servo.steering_channel),
        ];
        if let Some((joint, channel)) = servos
            .iter()
            .find(|(_, c)| motor_timers.contains(&pwm::timer_of(*c)))
        {
            return Err(PicarError(format!(
                "servo.{}_channel P{} shares timer {} with the motors",
                joint,
                channel,
                pwm::timer_of(*channel)
            )));
        }
        if let Some(bad) = self
            .hat
            .motor_calibration
            .iter()
            .find(|c| **c != 1 && **c != -1)
        {
            return Err(PicarError(format!(
                "hat.motor_calibration entries must be 1 or -1, got {}",
                bad
            )));
        }
        if self.chassis.speed > 100 {
            return Err(PicarError(format!(
                "chassis.speed must be at most 100, got {}",
                self.chassis.speed
            )));
        }
        if !(-90..=90).contains(&self.servo.angle) {
            return Err(PicarError(format!(
                "servo.angle must be within -90..=90, got {}",
                self.servo.angle
            )));
        }
        if self.camera.devices.is_empty() {
            return Err(PicarError("camera.devices is empty".to_string()));
        }
        if self.audio.phrase.trim().is_empty() {
            return Err(PicarError("audio.phrase is empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_stock_picar() {
        let conf = Config::parse("").unwrap();
        assert_eq!(conf.hat.addresses, vec![0x14, 0x15, 0x16]);
        assert_eq!(conf.hat.motor_pwm_channels, [13, 12]);
        assert_eq!(conf.chassis.speed, 10);
        assert_eq!(conf.chassis.drive_time(), Duration::from_millis(500));
        assert_eq!(conf.camera.devices.len(), 2);
        assert_eq!(conf.audio.phrase, "PiCar-X test");
        assert_eq!(conf.servo.settle_time(), Duration::from_millis(500));
    }

    #[test]
    fn sections_override_defaults() {
        let conf = Config::parse(
            r#"
            [hat]
            addresses = [0x15]

            [chassis]
            speed = 30

            [audio]
            engine = "pico2wave"
            phrase = "hello"
            "#,
        )
        .unwrap();
        assert_eq!(conf.hat.addresses, vec![0x15]);
        assert_eq!(conf.hat.i2c_bus, 1);
        assert_eq!(conf.chassis.speed, 30);
        assert_eq!(conf.chassis.drive_ms, 500);
        assert_eq!(conf.audio.engine, Engine::Pico2wave);
        assert_eq!(conf.audio.tool().requires, vec!["pico2wave", "aplay"]);
    }

    #[test]
    fn say_overrides_engine() {
        let conf = Config::parse(
            r#"
            [audio]
            say = { cmd = "echo {}" }
            "#,
        )
        .unwrap();
        assert_eq!(conf.audio.tool().cmd, "echo {}");
        assert!(conf.audio.tool().requires.is_empty());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::parse("[chassis]\nsped = 10\n").is_err());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(Config::parse("[chassis]\nspeed = 101\n").is_err());
        assert!(Config::parse("[servo]\nangle = -91\n").is_err());
        assert!(Config::parse("[servo]\npan_channel = 20\n").is_err());
        assert!(Config::parse("[camera]\ndevices = []\n").is_err());
        assert!(Config::parse("[audio]\nphrase = \"  \"\n").is_err());
    }

    #[test]
    fn servos_may_not_share_motor_timers() {
        // P12 is on timer 3 with the motors on P12/P13.
        let err = Config::parse("[servo]\npan_channel = 12\n").unwrap_err();
        assert!(err.0.contains("shares timer 3"));
        assert!(Config::parse("[servo]\nsteering_channel = 11\n").is_err());
        assert!(Config::parse("[servo]\ntilt_channel = 4\n").is_ok());
    }

    #[test]
    fn calibration_is_a_sign() {
        assert!(Config::parse("[hat]\nmotor_calibration = [1, 0]\n").is_err());
        assert!(Config::parse("[hat]\nmotor_calibration = [7, 1]\n").is_err());
        assert!(Config::parse("[hat]\nmotor_calibration = [-1, 1]\n").is_ok());
    }

    #[test]
    fn version_must_match() {
        assert!(Config::parse("ver = \"0.0.0-never\"\n").is_err());
        let ver = format!("ver = \"{}\"\n", env!("CARGO_PKG_VERSION"));
        assert!(Config::parse(&ver).is_ok());
    }
}
