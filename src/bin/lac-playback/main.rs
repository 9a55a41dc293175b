//! lac-playback CLI - Tool for inspecting and replaying LAC recordings.

use lac_playback::core::save_image;
use lac_playback::prelude::*;
use serde_json::json;
use std::env;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "info";
    let mut json = false;
    let mut semantic = false;
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "warn",
            "--json" => json = true,
            "--semantic" => semantic = true,
            _ => filtered_args.push(arg),
        }
    }
    init_logging(level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let result = match filtered_args[0] {
        "info" | "i" => with_file(&filtered_args, "info <file.lac>", cmd_info),
        "play" | "p" => with_file(&filtered_args, "play <file.lac>", |path| cmd_play(path, json)),
        "frame" | "f" => {
            let frame = filtered_args.get(2).and_then(|s| s.parse::<Frame>().ok());
            match frame {
                Some(frame) => with_file(&filtered_args, "", |path| cmd_frame(path, frame, json)),
                None => usage("frame <file.lac> <frame>"),
            }
        }
        "image" => {
            let kind = if semantic { ImageKind::Semantic } else { ImageKind::Grayscale };
            match (filtered_args.get(2), filtered_args.get(3).and_then(|s| s.parse::<Frame>().ok()), filtered_args.get(4)) {
                (Some(camera), Some(frame), Some(out)) => {
                    with_file(&filtered_args, "", |path| cmd_image(path, camera, frame, kind, out))
                }
                _ => usage("image <file.lac> <camera> <frame> <out.png> [--semantic]"),
            }
        }
        "version" => {
            println!(
                "lac-playback {} (built {})",
                env!("CARGO_PKG_VERSION"),
                env!("LAC_PLAYBACK_BUILD_DATE")
            );
            Ok(())
        }
        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }
        // Passing a file directly is equivalent to 'info'
        path if path.ends_with(".lac") && Path::new(path).exists() => cmd_info(path),
        other => {
            eprintln!("Unknown command: {}", other);
            print_help();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn with_file<F>(args: &[&str], usage_line: &str, run: F) -> Result<()>
where
    F: FnOnce(&str) -> Result<()>,
{
    match args.get(1) {
        Some(path) => run(path),
        None => usage(usage_line),
    }
}

fn usage(line: &str) -> ! {
    eprintln!("Error: missing arguments");
    eprintln!("Usage: lac-playback {}", line);
    std::process::exit(1);
}

fn print_help() {
    println!("lac-playback - LAC recording toolkit");
    println!();
    println!("USAGE:");
    println!("    lac-playback [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    i, info   <file>                          Show recording summary");
    println!("    p, play   <file>                          Step through every frame, printing IMU data");
    println!("    f, frame  <file> <frame>                  Show telemetry and camera state at a frame");
    println!("    image     <file> <camera> <frame> <out>   Export a camera image");
    println!("    version                                   Show version and build date");
    println!("    h, help                                   Show this help");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (very verbose)");
    println!("    -q, --quiet      Only show warnings");
    println!("    --json           JSON output for play/frame");
    println!("    --semantic       Export the semantic image instead of grayscale");
    println!();
    println!("EXAMPLES:");
    println!("    lac-playback info session.lac");
    println!("    lac-playback play session.lac --json > imu.jsonl");
    println!("    lac-playback frame session.lac 120");
    println!("    lac-playback image session.lac FrontLeft 120 front.png");
}

fn cmd_info(path: &str) -> Result<()> {
    info!("Opening recording: {}", path);
    let archive = Archive::open(path)?;
    let frames = archive.frames();
    let initial = archive.initial();

    println!("Recording: {}", path);
    println!("Frames:    {} ({}..={})", frames.len(), frames.min_frame(), frames.max_frame());
    if let (Some(first), Some(last)) = (frames.rows().first(), frames.rows().last()) {
        println!("Mission:   {:.2}s .. {:.2}s", first.mission_time, last.mission_time);
    }
    println!("Fiducials: {}", initial.fiducials);
    println!("Rover:     {}", initial.rover);
    println!("Lander:    {}", initial.lander);
    println!();

    println!("Cameras ({}):", initial.cameras.len());
    for table in archive.cameras() {
        let config = archive.camera_config(table.name())?;
        let first = table.first_frame().map_or("-".to_string(), |f| f.to_string());
        println!(
            "  {:<12} rows={:<6} first={:<6} semantic={:<5} light={}",
            table.name(),
            table.len(),
            first,
            config.use_semantic,
            config.light_intensity
        );
    }

    let custom: Vec<_> = archive.custom_records().collect();
    if !custom.is_empty() {
        println!();
        println!("Custom records ({}):", custom.len());
        for record in custom {
            println!("  {:<12} rows={} columns={}", record.name(), record.len(), record.headers().join(","));
        }
    }

    let metadata = archive.metadata();
    if !metadata.is_empty() {
        println!();
        println!("Metadata keys: {}", metadata.keys().collect::<Vec<_>>().join(", "));
    }
    Ok(())
}

fn cmd_play(path: &str, json: bool) -> Result<()> {
    info!("Opening recording: {}", path);
    let mut agent = PlaybackAgent::open(path)?;

    loop {
        let imu = agent.get_imu_data();
        if json {
            println!("{}", json!({ "frame": agent.frame(), "imu": imu }));
        } else {
            println!("Frame {}: {:?}", agent.frame(), imu);
        }
        if agent.at_end() {
            break;
        }
        agent.step_frame();
    }
    debug!("Reached frame {}", agent.frame());
    Ok(())
}

fn cmd_frame(path: &str, frame: Frame, json: bool) -> Result<()> {
    let mut agent = PlaybackAgent::open(path)?;
    agent.set_frame(frame)?;

    let mut cameras = serde_json::Map::new();
    for name in agent.sensors().keys() {
        cameras.insert(
            name.clone(),
            json!({
                "enabled": agent.get_camera_state(name)?,
                "light": agent.get_light_state(name)?,
                "pose": agent.get_camera_position(name)?.to_array(),
            }),
        );
    }

    if json {
        println!("{}", json!({ "telemetry": agent.row(), "cameras": cameras }));
        return Ok(());
    }

    println!("Frame:        {}", agent.frame());
    println!("Mission time: {:.3}", agent.get_mission_time());
    println!("Power:        {:.3}", agent.get_current_power());
    println!("Linear speed: {:.3}", agent.get_linear_speed());
    println!("Angular:      {:.3}", agent.get_angular_speed());
    println!("Cover angle:  {:.3}", agent.get_radiator_cover_angle());
    println!("IMU:          {:?}", agent.get_imu_data());
    println!("Pose:         {}", agent.get_transform());
    println!();
    for name in agent.sensors().keys() {
        println!(
            "  {:<12} enabled={:<5} light={:<6} pose={}",
            name,
            agent.get_camera_state(name)?,
            agent.get_light_state(name)?,
            agent.get_camera_position(name)?
        );
    }
    Ok(())
}

fn cmd_image(path: &str, camera: &str, frame: Frame, kind: ImageKind, out: &str) -> Result<()> {
    let archive = Archive::open(path)?;
    let image = archive.camera_image(camera, frame, kind)?;
    save_image(&image, Path::new(out))?;
    println!("Wrote {} {}x{} -> {}", kind, image.width(), image.height(), out);
    Ok(())
}
