//! picar-check is a hardware self-test for the PiCar-X robot car kit.
//!
//! It runs four independent probes, one after another, and prints a
//! pass/fail summary:
//!
//! | Probe               | What it does                                       |
//! |---------------------|----------------------------------------------------|
//! | Basic Functionality | drives both rear motors forward briefly            |
//! | Camera              | grabs one frame from a V4L2 device or the Pi camera|
//! | Audio/TTS           | speaks a test phrase                               |
//! | Servo Control       | centres the camera pan, tilt and steering servos   |
//!
//! A failing probe never stops the run. The exit code is `0` when every
//! probe passed, `2` when none did, `1` otherwise, and `130` when the run was
//! interrupted with Ctrl-C.
//!
//! ## Hardware
//!
//! Motors and servos are driven through the Robot HAT MCU over I2C (bus 1,
//! address `0x14`, `0x15` or `0x16`) plus three GPIO lines on the Pi: the MCU
//! reset (BCM 5) and the two motor direction lines (BCM 23 and 24).
//! Cameras and speech go through the usual system tools: `v4l2-ctl`,
//! `rpicam-hello`, `espeak` or `pico2wave`, and `aplay`.
//!
//! ## Configuration
//!
//! Everything has a default that fits a stock car. A `picar.toml` in the
//! working directory (or a file passed with `-c`) overrides any of it:
//! ```toml
//! [chassis]
//! # Forward speed in percent.
//! speed = 20
//! drive_ms = 800
//!
//! [camera]
//! # Device nodes or glob patterns, tried in order.
//! devices = ["/dev/video*"]
//! pi_camera = false
//!
//! [audio]
//! engine = "pico2wave"
//! phrase = "Hello from the garage"
//!
//! [servo]
//! angle = 10
//! ```
//! Camera and speech commands are templates in which `{}` is replaced by
//! the device or phrase, so any tool can stand in:
//! ```toml
//! [audio]
//! say = { cmd = "flite -t {}", requires = ["flite"] }
//! ```
//!
//! ## Filters
//!
//! `--include` and `--exclude` take regexes matched against the probe name
//! (`"Audio/TTS"`) or its key (`audio`). `--dry-run` prints the selection
//! without touching the hardware:
//! ```text
//! $ picar-check -e 'chassis|servo' -n
//! Camera: grabs one frame from the first working camera
//! Audio/TTS: speaks a test phrase
//! ```
pub mod car;
pub mod cli;
pub mod config;
pub mod errors;
pub mod executor;
pub mod hat;
pub mod printer;
pub mod probes;
pub mod shell;
