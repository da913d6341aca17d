/* Demo shell for the tremolo kernel: a live stream with keyboard waveform
switching, or an offline WAV bounce. The key loop stands in for the
control-rate side of a plugin host. */

#[cfg(feature = "native")]
fn main() -> anyhow::Result<()> {
    use std::io::{self, Write};

    use clap::{Arg, ArgAction, Command};
    use tremolo::platform::{AudioOutput, CpalOutput, TremoloRig};
    use tremolo::utils::init_logger;
    use tremolo::Waveform;

    init_logger();

    let command = Command::new("tremolo")
        .about("LFO-driven amplitude modulation demo")
        .arg(
            Arg::new("carrier")
                .long("carrier")
                .value_parser(clap::value_parser!(f32))
                .default_value("220.0")
                .help("Test tone fed through the kernel, in Hz"),
        )
        .arg(
            Arg::new("triangle")
                .long("triangle")
                .action(ArgAction::SetTrue)
                .help("Start with the triangle waveform"),
        );

    #[cfg(feature = "bounce")]
    let command = command
        .arg(
            Arg::new("bounce")
                .long("bounce")
                .value_name("WAV")
                .help("Render offline to a WAV file instead of playing"),
        )
        .arg(
            Arg::new("seconds")
                .long("seconds")
                .value_parser(clap::value_parser!(f32))
                .default_value("4.0")
                .help("Length of the offline render, in seconds"),
        );

    let matches = command.get_matches();
    let carrier_hz = *matches.get_one::<f32>("carrier").unwrap();
    let waveform = if matches.get_flag("triangle") {
        Waveform::Triangle
    } else {
        Waveform::Sine
    };

    #[cfg(feature = "bounce")]
    if let Some(path) = matches.get_one::<String>("bounce") {
        let seconds = *matches.get_one::<f32>("seconds").unwrap();
        return tremolo::bounce::bounce_to_wav(
            std::path::Path::new(path),
            seconds,
            44100,
            waveform,
            carrier_hz,
        );
    }

    let rig = TremoloRig::new(44100.0, carrier_hz);
    rig.set_waveform(waveform);

    let mut output = CpalOutput::new();
    output.initialize(rig.sample_rate())?;
    output.create_stream(rig.tremolo(), rig.carrier_hz())?;
    output.start()?;

    println!("Press '1' for sine, '2' for triangle, 'r' to reset phase, 'q' to quit");

    loop {
        let mut input = String::new();
        io::stdout().flush().unwrap();
        io::stdin().read_line(&mut input).unwrap();

        match input.trim() {
            "1" => {
                println!("Sine modulation");
                rig.set_waveform(Waveform::Sine);
            }
            "2" => {
                println!("Triangle modulation");
                rig.set_waveform(Waveform::Triangle);
            }
            "r" => {
                println!("Resetting oscillator phase");
                rig.reset();
            }
            "q" => {
                println!("Quitting...");
                break;
            }
            _ => {
                println!("Press '1' for sine, '2' for triangle, 'r' to reset phase, 'q' to quit");
            }
        }
    }

    output.stop()?;
    Ok(())
}

#[cfg(not(feature = "native"))]
fn main() {
    println!("This binary is only available with the 'native' feature enabled.");
}
