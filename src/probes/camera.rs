use super::Env;
use crate::{config::CameraConfig, errors::ProbeError};
use log::debug;
use tokio::fs;

/// Grab one frame from the first camera device that works, falling back to
/// the Pi camera module.
pub async fn run(env: &mut Env<'_>) -> Result<(), ProbeError> {
    env.printer.blank()?;
    env.printer.line("Testing camera functionality...")?;
    let camera = &env.config.camera;
    camera.capture.check()?;
    env.printer.pass("Video capture tools found")?;

    for device in expand_devices(&camera.devices) {
        if fs::metadata(&device).await.is_err() {
            env.printer
                .warn(format!("Camera device {} not accessible", device))?;
            continue;
        }
        match camera.capture.run(&device, camera.timeout()).await {
            Ok(frame) if !frame.is_empty() => {
                let size = frame_size(camera, &device).await;
                env.printer.pass(format!(
                    "Camera capture successful on device {} (frame size: {})",
                    device, size
                ))?;
                return Ok(());
            }
            Ok(_) => debug!("{} produced an empty frame", device),
            Err(err) => debug!("{} capture failed: {:?}", device, err),
        }
        env.printer.warn(format!(
            "Camera device {} opened but capture failed",
            device
        ))?;
    }

    if camera.pi_camera {
        if let Err(err) = camera.pi_preview.check() {
            debug!("pi camera: {}", err);
            env.printer.warn("Pi camera stack not available")?;
        } else {
            env.printer
                .pass("Pi camera stack available, testing Pi camera...")?;
            let run_for = camera.settle_ms.to_string();
            let limit = camera.timeout() + camera.settle_time();
            match camera.pi_preview.run(&run_for, limit).await {
                Ok(_) => {
                    env.printer.pass("Raspberry Pi camera test successful")?;
                    return Ok(());
                }
                Err(err) => env
                    .printer
                    .warn(format!("Pi camera test failed: {}", err))?,
            }
        }
    }

    Err(ProbeError::Fault("No working camera found".to_string()))
}

/// Expand glob patterns. A pattern that matches nothing is kept as is so it
/// can be reported as inaccessible.
pub fn expand_devices(patterns: &[String]) -> Vec<String> {
    let mut devices = Vec::new();
    for pattern in patterns {
        let matched = glob::glob(pattern)
            .map(|paths| {
                paths
                    .filter_map(Result::ok)
                    .map(|p| p.to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        let found = if matched.is_empty() {
            vec![pattern.clone()]
        } else {
            matched
        };
        for device in found {
            if !devices.contains(&device) {
                devices.push(device);
            }
        }
    }
    devices
}

async fn frame_size(camera: &CameraConfig, device: &str) -> String {
    match camera.format.run(device, camera.timeout()).await {
        Ok(out) => parse_frame_size(&String::from_utf8_lossy(&out))
            .unwrap_or_else(|| "unknown".to_string()),
        Err(err) => {
            debug!("{} format query failed: {:?}", device, err);
            "unknown".to_string()
        }
    }
}

/// Pull `WxH` out of `v4l2-ctl --get-fmt-video` output, which reports it as
/// `Width/Height      : 640/480`.
pub fn parse_frame_size(out: &str) -> Option<String> {
    let line = out
        .lines()
        .find(|l| l.trim_start().starts_with("Width/Height"))?;
    let (_, value) = line.split_at(line.find(':')? + 1);
    let mut dims = value.trim().splitn(2, '/');
    let width: u32 = dims.next()?.trim().parse().ok()?;
    let height: u32 = dims.next()?.trim().parse().ok()?;
    Some(format!("{}x{}", width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_size_from_v4l2_ctl() {
        let out = "Format Video Capture:\n\
                   \tWidth/Height      : 640/480\n\
                   \tPixel Format      : 'YUYV' (YUYV 4:2:2)\n";
        assert_eq!(parse_frame_size(out), Some("640x480".to_string()));
    }

    #[test]
    fn frame_size_missing() {
        assert_eq!(parse_frame_size("Format Video Capture:\n"), None);
        assert_eq!(parse_frame_size("Width/Height : wide/tall"), None);
    }

    #[test]
    fn unmatched_patterns_are_kept() {
        let devices = expand_devices(&[
            "/dev/picar-check-none0".to_string(),
            "/dev/picar-check-none*".to_string(),
        ]);
        assert_eq!(
            devices,
            vec!["/dev/picar-check-none0", "/dev/picar-check-none*"]
        );
    }

    #[test]
    fn matching_patterns_expand_in_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in &["video1", "video0", "audio0"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let base = dir.path().to_string_lossy().into_owned();
        let devices = expand_devices(&[
            format!("{}/video*", base),
            format!("{}/video0", base),
        ]);
        assert_eq!(
            devices,
            vec![format!("{}/video0", base), format!("{}/video1", base)]
        );
    }

    #[test]
    fn duplicates_keep_first_position() {
        let devices = expand_devices(&[
            "/dev/picar-check-none1".to_string(),
            "/dev/picar-check-none0".to_string(),
            "/dev/picar-check-none1".to_string(),
        ]);
        assert_eq!(
            devices,
            vec!["/dev/picar-check-none1", "/dev/picar-check-none0"]
        );
    }
}
