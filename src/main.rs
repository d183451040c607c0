mod tone;

use aaudio_out_engine::hw::latency::now_nanos;
use aaudio_out_engine::{
    AAudioOptions, AudioRequest, AudioSource, ChannelMap, HwDriver, InitFlags, Message,
    SampleFormat, reload_channel,
};
use clap::Parser;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::time::{Instant, interval, sleep, sleep_until};
use tone::ToneSource;
use tracing::{debug, error, info, warn};
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "aaudio-play", about = "Play a test tone through AAudio")]
struct Args {
    /// Tone frequency in Hz
    #[arg(long, default_value_t = 440.0)]
    frequency: f64,

    /// Tone length in seconds
    #[arg(long, default_value_t = 3.0)]
    seconds: f64,

    /// Sample format requested from the driver
    #[arg(long, default_value = "float")]
    format: SampleFormat,

    /// Channel layout: a name (5.1), a count (2) or speakers (fl-fr)
    #[arg(long, default_value = "stereo")]
    channels: ChannelMap,

    #[arg(long, default_value_t = 48_000)]
    rate: u32,

    /// Request an exclusive stream
    #[arg(long)]
    exclusive: bool,

    /// Tag the stream as music instead of movie audio
    #[arg(long)]
    music: bool,

    /// Driver option, e.g. `-o performance-mode=low-latency`
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
    options: Vec<String>,

    /// Give up after this many reloads
    #[arg(long, default_value_t = 3)]
    max_reloads: u32,

    /// More output; repeat for trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

enum Outcome {
    Finished(Box<dyn AudioSource>),
    Reload(Box<dyn AudioSource>),
}

async fn play_once(
    options: &AAudioOptions,
    request: &AudioRequest,
    source: Box<dyn AudioSource>,
    budget: Duration,
    deadline_probe: &std::sync::atomic::AtomicI64,
) -> Result<Outcome, String> {
    let (tx, mut rx) = reload_channel();
    let mut driver = HwDriver::new(options.clone(), source, tx);
    driver.init(request).map_err(|e| e.to_string())?;
    if let Some(format) = driver.stream_format() {
        info!(
            "Playing {} {} Hz {} (API level {}, buffer {} frames)",
            format.format,
            format.sample_rate,
            format.channels,
            driver.api_level().unwrap_or_default(),
            driver.device_buffer()
        );
    }
    driver.start().map_err(|e| e.to_string())?;

    let give_up = Instant::now() + budget;
    let mut report = interval(Duration::from_millis(500));
    let reload = loop {
        tokio::select! {
            message = rx.recv() => match message {
                Some(Message::Reload) => break true,
                Some(Message::Drained) | None => break false,
            },
            _ = report.tick() => {
                let lead = deadline_probe.load(Ordering::Relaxed) - now_nanos();
                debug!(
                    "Output latency {:.1} ms, {} xruns",
                    lead as f64 / 1e6,
                    driver.xrun_count().unwrap_or_default()
                );
            }
            _ = sleep_until(give_up) => {
                warn!("Stream did not drain in time");
                break false;
            }
        }
    };

    let source = driver
        .into_source()
        .ok_or_else(|| "audio source lost".to_string())?;
    Ok(if reload {
        Outcome::Reload(source)
    } else {
        Outcome::Finished(source)
    })
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args = Args::parse();
    let level = match args.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let mut options = AAudioOptions::load().map_err(|e| e.to_string())?;
    options
        .apply_pairs(args.options.iter().map(String::as_str))
        .map_err(|e| e.to_string())?;

    let request = AudioRequest {
        format: args.format,
        channels: args.channels.clone(),
        sample_rate: args.rate,
        flags: InitFlags {
            exclusive: args.exclusive,
            music_role: args.music,
        },
    };

    let tone = ToneSource::new(args.frequency, args.seconds);
    let deadline_probe = tone.deadline_probe();
    let mut source: Box<dyn AudioSource> = Box::new(tone);
    let budget = Duration::from_secs_f64(args.seconds.max(0.0) + 2.0);

    let mut reloads = 0;
    loop {
        match play_once(&options, &request, source, budget, &deadline_probe).await {
            Ok(Outcome::Finished(_)) => {
                info!("Done");
                return Ok(());
            }
            Ok(Outcome::Reload(next)) => {
                reloads += 1;
                if reloads > args.max_reloads {
                    return Err(format!("giving up after {} reloads", args.max_reloads));
                }
                warn!("Reloading audio output ({reloads}/{})", args.max_reloads);
                sleep(Duration::from_millis(100 * u64::from(reloads))).await;
                source = next;
            }
            Err(e) => {
                error!("{e}");
                return Err(e);
            }
        }
    }
}
