mod args;

use {
    self::args::Args,
    anyhow::Context,
    bytemuck::bytes_of,
    clap::Parser,
    flycam::{
        camera::Camera,
        config::Config,
        input::{spawn_reader, InputEvent},
        light::{Attenuation, PhongLight},
    },
    glam::Mat4,
    log::{debug, error, info, trace, warn},
    std::{
        fs::{File, OpenOptions},
        io::{stdin, BufRead, BufReader, BufWriter, Write},
        panic::{set_hook, take_hook},
        process::exit,
    },
};

fn main() -> anyhow::Result<()> {
    #[cfg(debug_assertions)]
    pretty_env_logger::init();

    set_thread_panic_hook();

    let args = Args::parse();
    let mut config = args
        .config
        .as_ref()
        .map(|path| Config::read_from(path))
        .unwrap_or_else(Config::read);

    if args.fps {
        config.planar_lock = true;
    }

    if args.no_pitch_bound {
        config.pitch_bound = false;
    }

    if args.write_config {
        let res = match &args.config {
            Some(path) => config.write_to(path),
            None => config.write(),
        };

        res.context("Writing config")?;
    }

    let reader: Box<dyn BufRead + Send> = match &args.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Opening {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(stdin())),
    };

    let mut dump = args
        .dump
        .as_ref()
        .map(|path| {
            OpenOptions::new()
                .append(true)
                .create(true)
                .open(path)
                .map(BufWriter::new)
                .with_context(|| format!("Opening {}", path.display()))
        })
        .transpose()?;

    let mut camera = Camera::new(config.camera_info());
    let mut light = PhongLight::default();
    light.set_position(config.light_position());

    // Falloff coefficients sized so the light still reaches the far plane
    light.set_attenuation(Attenuation::from_distance(config.z_far));

    trace!("Starting");
    info!("{camera}");

    let (events, input_thread) = spawn_reader(reader);
    let mut frame_count = 0;

    for event in events.iter() {
        match event {
            InputEvent::Frame => {
                draw_frame(frame_count, &camera, &light, &config, dump.as_mut())?;
                frame_count += 1;
            }
            InputEvent::Look { x_offset, y_offset } => {
                camera.look_around(x_offset, y_offset, config.pitch_bound);
            }
            InputEvent::Move { direction, dt } => {
                let dt = dt.unwrap_or(config.frame_time);

                if let Err(err) = camera.translate_named(&direction, dt) {
                    warn!("Ignoring move: {err}");
                }
            }
            InputEvent::Quit => break,
            InputEvent::Zoom { y_offset } => camera.zoom_in_out(y_offset, config.zoom_bound),
        }
    }

    // The reader stops on its own after a quit event or at the end of its input
    if let Err(err) = input_thread.join() {
        error!("Input thread panicked: {err:?}");
    }

    if let Some(dump) = dump.as_mut() {
        dump.flush().context("Writing uniform data")?;
    }

    info!("Drew {frame_count} frames");
    trace!("OK");

    Ok(())
}

/// Reports the matrices and light falloff a renderer would upload for one frame.
fn draw_frame(
    index: usize,
    camera: &Camera,
    light: &PhongLight,
    config: &Config,
    dump: Option<&mut BufWriter<File>>,
) -> anyhow::Result<()> {
    let uniform = camera.uniform(config.aspect_ratio, config.z_near, config.z_far);
    let light_distance = camera.position().distance(light.position());
    let attenuation = light.attenuation().factor(light_distance);

    debug!("{camera}");

    println!(
        "frame {index}: position {} zoom {}",
        camera.position(),
        camera.zoom()
    );
    print_matrix("view", uniform.view);
    print_matrix("projection", uniform.projection);
    println!("light distance {light_distance:.4} attenuation {attenuation:.4}");

    if let Some(dump) = dump {
        dump.write_all(bytes_of(&uniform))
            .context("Writing uniform data")?;
    }

    Ok(())
}

fn print_matrix(name: &str, matrix: Mat4) {
    println!("{name}:");

    for index in 0..4 {
        let row = matrix.row(index);
        println!(
            "  {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
            row.x, row.y, row.z, row.w
        );
    }
}

/// Makes sure that any thread which panics causes the program to exit.
fn set_thread_panic_hook() {
    let orig_hook = take_hook();

    set_hook(Box::new(move |panic_info| {
        orig_hook(panic_info);

        exit(1);
    }));
}
