use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use xform_math::{Matrix4, Vector3, Vector4};
use xform_render::{Camera, DebugTextRenderer, Draw, DrawUniforms, Projection, Renderer};
use xform_scene::{AngleAnimator, ArmAction, Axis, DEFAULT_ANGLE_STEP, JointedArm};

#[derive(Parser)]
#[command(name = "xform-cli", about = "CLI tool for evaluating transform chains")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Build an MVP matrix from a camera and transform a point with it
    Mvp(MvpArgs),
    /// Pose the robot arm and print its segment matrices
    Arm {
        /// Arm action to apply, in order (repeatable)
        #[arg(short, long = "action", value_parser = parse_action)]
        actions: Vec<ArmAction>,
        /// Print segments as JSON
        #[arg(long)]
        json: bool,
    },
    /// Step the rotation animator at a fixed frame interval
    Animate {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "5")]
        frames: u32,
        /// Milliseconds between frames
        #[arg(long, default_value = "16")]
        dt_ms: u64,
        /// Rotation speed in degrees per second
        #[arg(long, default_value_t = DEFAULT_ANGLE_STEP)]
        step: f32,
        /// Rotation axis
        #[arg(long, value_enum, default_value_t = AxisArg::Z)]
        axis: AxisArg,
    },
}

#[derive(Args)]
struct MvpArgs {
    /// JSON camera file; the flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    eye: Option<Vector3>,
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    center: Option<Vector3>,
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    up: Option<Vector3>,
    /// Vertical field of view in degrees
    #[arg(long)]
    fovy: Option<f32>,
    #[arg(long)]
    aspect: Option<f32>,
    #[arg(long)]
    near: Option<f32>,
    #[arg(long)]
    far: Option<f32>,
    /// Model translation
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    translate: Option<Vector3>,
    /// Model-space point to transform
    #[arg(long, default_value = "1,1,1", value_parser = parse_vec3, allow_hyphen_values = true)]
    point: Vector3,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct MvpReport {
    camera: Camera,
    view: Matrix4,
    projection: Matrix4,
    model: Matrix4,
    mvp: Matrix4,
    clip: Vector4,
    ndc: Option<[f32; 3]>,
}

fn parse_vec3(s: &str) -> Result<Vector3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z but got {s:?}"));
    }
    let mut xyz = [0.0f32; 3];
    for (slot, part) in xyz.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|e| format!("bad component {part:?}: {e}"))?;
    }
    Ok(Vector3::from(xyz))
}

fn parse_action(s: &str) -> Result<ArmAction, String> {
    s.parse::<ArmAction>().map_err(|e| {
        let names: Vec<&str> = ArmAction::ALL.iter().map(|a| a.name()).collect();
        format!("{e} (expected one of: {})", names.join(", "))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AxisArg {
    X,
    Y,
    Z,
}

impl From<AxisArg> for Axis {
    fn from(arg: AxisArg) -> Self {
        match arg {
            AxisArg::X => Axis::X,
            AxisArg::Y => Axis::Y,
            AxisArg::Z => Axis::Z,
        }
    }
}

/// Timestamp of `frame` at a fixed interval, saturating instead of overflowing.
fn frame_time(frame: u32, dt_ms: u64) -> Duration {
    Duration::from_millis(u64::from(frame).saturating_mul(dt_ms))
}

fn load_camera(args: &MvpArgs) -> anyhow::Result<Camera> {
    let mut camera = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading camera config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing camera config {}", path.display()))?
        }
        None => Camera::default(),
    };

    if let Some(eye) = args.eye {
        camera.eye = eye;
    }
    if let Some(center) = args.center {
        camera.center = center;
    }
    if let Some(up) = args.up {
        camera.up = up;
    }

    let overrides = [args.fovy, args.aspect, args.near, args.far];
    if overrides.iter().any(Option::is_some) {
        // Perspective flags on an orthographic config switch it to a
        // perspective projection seeded from the defaults.
        let base = match camera.projection {
            p @ Projection::Perspective { .. } => p,
            Projection::Orthographic { .. } => Projection::default(),
        };
        if let Projection::Perspective {
            fovy_deg,
            aspect,
            near,
            far,
        } = base
        {
            camera.projection = Projection::Perspective {
                fovy_deg: args.fovy.unwrap_or(fovy_deg),
                aspect: args.aspect.unwrap_or(aspect),
                near: args.near.unwrap_or(near),
                far: args.far.unwrap_or(far),
            };
        }
    }

    Ok(camera)
}

fn run_mvp(args: &MvpArgs) -> anyhow::Result<()> {
    let camera = load_camera(args)?;
    tracing::debug!(?camera, "camera resolved");

    let view = camera.view_matrix().context("building view matrix")?;
    let projection = camera
        .projection_matrix()
        .context("building projection matrix")?;
    let model = match args.translate {
        Some(t) => Matrix4::from_translation(t.x, t.y, t.z),
        None => Matrix4::IDENTITY,
    };

    let uniforms = DrawUniforms::new(&camera.view_projection()?, &model)
        .context("building draw uniforms")?;
    let mvp = Matrix4::from_cols_array(uniforms.mvp);
    let clip = mvp.multiply_vector4(Vector4::from_point(args.point));
    let ndc = (clip.w != 0.0).then(|| [clip.x / clip.w, clip.y / clip.w, clip.z / clip.w]);

    let report = MvpReport {
        camera,
        view,
        projection,
        model,
        mvp,
        clip,
        ndc,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("View:\n{}", report.view);
    println!("Projection:\n{}", report.projection);
    println!("MVP:\n{}", report.mvp);
    println!(
        "point ({}, {}, {}) -> clip ({:.6}, {:.6}, {:.6}, {:.6})",
        args.point.x, args.point.y, args.point.z, clip.x, clip.y, clip.z, clip.w
    );
    match ndc {
        Some(n) => println!("ndc ({:.6}, {:.6}, {:.6})", n[0], n[1], n[2]),
        None => println!("ndc undefined (w = 0)"),
    }
    Ok(())
}

fn run_arm(actions: &[ArmAction], json: bool) -> anyhow::Result<()> {
    let mut arm = JointedArm::new();
    for &action in actions {
        if !arm.apply(action) {
            tracing::info!(action = action.name(), "joint at its limit, action ignored");
        }
    }

    let segments = arm.segments()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&segments)?);
        return Ok(());
    }

    println!(
        "Arm: arm1={} joint1={} wrist={} finger={}",
        arm.arm1(),
        arm.joint1(),
        arm.wrist(),
        arm.finger()
    );

    // The jointed-model demo camera: 50 degrees, looking from (20, 10, 30).
    let camera = Camera {
        eye: Vector3::new(20.0, 10.0, 30.0),
        center: Vector3::ZERO,
        up: Vector3::Y,
        projection: Projection::Perspective {
            fovy_deg: 50.0,
            aspect: 1.0,
            near: 1.0,
            far: 100.0,
        },
    };
    let draws: Vec<Draw> = segments
        .iter()
        .map(|s| Draw::new(s.name, s.model))
        .collect();
    print!("{}", DebugTextRenderer::new().render(&camera, &draws)?);
    Ok(())
}

fn run_animate(frames: u32, dt_ms: u64, step: f32, axis: Axis) -> anyhow::Result<()> {
    println!("Animate: frames={frames}, dt={dt_ms}ms, step={step} deg/s, axis={axis:?}");

    let camera = Camera::default();
    let vp = camera.view_projection()?;
    let mut animator = AngleAnimator::new(step);

    for frame in 0..frames {
        let now = frame_time(frame, dt_ms);
        let angle = animator.tick(now);
        let model = animator.model_matrix(axis)?;
        let uniforms = DrawUniforms::new(&vp, &model)?;
        let tip = Matrix4::from_cols_array(uniforms.mvp).multiply_vector4(Vector4::new(
            0.0, 0.5, 0.0, 1.0,
        ));
        println!(
            "frame {frame}: t={}ms angle={angle:.3} tip_clip=({:.4}, {:.4}, {:.4}, {:.4})",
            now.as_millis(),
            tip.x,
            tip.y,
            tip.z,
            tip.w
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("xform-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("math: {}", xform_math::crate_info());
            println!("scene: {}", xform_scene::crate_info());
            println!("render: {}", xform_render::crate_info());
        }
        Commands::Mvp(args) => run_mvp(&args)?,
        Commands::Arm { actions, json } => run_arm(&actions, json)?,
        Commands::Animate {
            frames,
            dt_ms,
            step,
            axis,
        } => run_animate(frames, dt_ms, step, axis.into())?,
    }

    Ok(())
}
