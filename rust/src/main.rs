use std::env;
use std::io::{self, Write};
use std::process;

use serde_json::json;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use segid::{
    Delimiter, Generator, GeneratorConfig, IdError, OsRandom, SystemClock, ThreadRandom,
    compute_check_char, validate_check_char,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Os,
    Thread,
}

#[derive(Debug, Clone)]
struct EmitOpts {
    config: GeneratorConfig,
    source: Source,
    count: usize,
    json: bool,
}

impl Default for EmitOpts {
    fn default() -> Self {
        Self {
            config: GeneratorConfig::default(),
            source: Source::Os,
            count: 0,
            json: false,
        }
    }
}

fn print_help() {
    eprintln!(
        "segid - segmented identifier generator CLI\n\n\
Usage:\n  segid next [options]\n  segid stream [options] [--count <n>]\n  segid validate <id>\n  segid check <text>\n  segid healthcheck [options] [--json]\n\n\
Options:\n  --prefix <s> | --no-prefix     literal prefix (default ID)\n  --postfix <s>                  literal postfix\n  --segments <1-4>               number of random segments (default 1)\n  --segment-length <n>           characters per segment (default 12)\n  --no-date                      omit the date segment\n  --timestamp                    append HHMMSS to the date\n  --two-digit-year               YYMMDD instead of YYYYMMDD\n  --local-time                   local wall clock instead of UTC\n  --delimiter <d>                one of - _ | . # none (default -)\n  --lowercase                    lowercase random segments\n  --check-bit                    append a check character\n  --config <json>                JSON options; later flags override\n  --source os|thread             entropy source (default os)\n\n\
Logging is controlled by RUST_LOG (default segid=warn).\n"
    );
}

fn take_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("missing value for {flag}"))
}

fn parse_u32(value: &str, flag: &str) -> Result<u32, String> {
    value
        .parse::<u32>()
        .map_err(|_| format!("invalid integer for {flag}"))
}

fn parse_source(s: &str) -> Result<Source, String> {
    match s {
        "os" => Ok(Source::Os),
        "thread" => Ok(Source::Thread),
        _ => Err("--source must be os or thread".to_string()),
    }
}

fn parse_emit_flags(
    args: &[String],
    allow_count: bool,
    allow_json: bool,
) -> Result<EmitOpts, String> {
    let mut opts = EmitOpts::default();
    let mut i = 0;

    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--prefix" => {
                opts.config.prefix = Some(take_value(args, i, flag)?.to_string());
                i += 2;
            }
            "--no-prefix" => {
                opts.config.prefix = None;
                i += 1;
            }
            "--postfix" => {
                opts.config.postfix = Some(take_value(args, i, flag)?.to_string());
                i += 2;
            }
            "--segments" => {
                opts.config.num_segments = parse_u32(take_value(args, i, flag)?, flag)?;
                i += 2;
            }
            "--segment-length" => {
                opts.config.segment_length = parse_u32(take_value(args, i, flag)?, flag)?;
                i += 2;
            }
            "--no-date" => {
                opts.config.include_date = false;
                i += 1;
            }
            "--timestamp" => {
                opts.config.use_timestamp = true;
                i += 1;
            }
            "--two-digit-year" => {
                opts.config.use_two_digit_year = true;
                i += 1;
            }
            "--local-time" => {
                opts.config.use_local_time = true;
                i += 1;
            }
            "--delimiter" => {
                opts.config.delimiter =
                    Delimiter::parse(take_value(args, i, flag)?).map_err(|e| e.to_string())?;
                i += 2;
            }
            "--lowercase" => {
                opts.config.lowercase = true;
                i += 1;
            }
            "--check-bit" => {
                opts.config.include_check_bit = true;
                i += 1;
            }
            "--config" => {
                opts.config = GeneratorConfig::from_json(take_value(args, i, flag)?)
                    .map_err(|e| e.to_string())?;
                i += 2;
            }
            "--source" => {
                opts.source = parse_source(take_value(args, i, flag)?)?;
                i += 2;
            }
            "--count" if allow_count => {
                opts.count = take_value(args, i, flag)?
                    .parse::<usize>()
                    .map_err(|_| "invalid integer for --count".to_string())?;
                i += 2;
            }
            "--json" if allow_json => {
                opts.json = true;
                i += 1;
            }
            _ => return Err(format!("unknown flag: {}", args[i])),
        }
    }

    Ok(opts)
}

fn build_generator(opts: &EmitOpts) -> Result<Generator, IdError> {
    let config = opts.config.clone();
    match opts.source {
        Source::Os => Generator::with_sources(config, OsRandom, SystemClock),
        Source::Thread => Generator::with_sources(config, ThreadRandom, SystemClock),
    }
}

fn run_next(args: &[String]) -> Result<(), String> {
    let opts = parse_emit_flags(args, false, false)?;
    let generator = build_generator(&opts).map_err(|e| e.to_string())?;
    println!("{}", generator.generate().map_err(|e| e.to_string())?);
    Ok(())
}

fn run_stream(args: &[String]) -> Result<(), String> {
    let opts = parse_emit_flags(args, true, false)?;
    let generator = build_generator(&opts).map_err(|e| e.to_string())?;
    let mut stdout = io::stdout().lock();

    // count 0 streams until stdout closes
    for (emitted, id) in generator.iter().enumerate() {
        if opts.count > 0 && emitted >= opts.count {
            break;
        }
        let id = id.map_err(|e| e.to_string())?;
        if writeln!(stdout, "{id}").and_then(|_| stdout.flush()).is_err() {
            break;
        }
    }

    Ok(())
}

fn run_validate(args: &[String]) -> Result<(), String> {
    let [id] = args else {
        return Err("validate requires exactly one id".to_string());
    };

    let ok = validate_check_char(id);
    println!("{}", if ok { "true" } else { "false" });
    if ok {
        Ok(())
    } else {
        Err("check character mismatch".to_string())
    }
}

fn run_check(args: &[String]) -> Result<(), String> {
    let [text] = args else {
        return Err("check requires exactly one argument".to_string());
    };
    println!("{}", compute_check_char(text));
    Ok(())
}

fn run_healthcheck(args: &[String]) -> Result<(), String> {
    let opts = parse_emit_flags(args, false, true)?;
    let generator = build_generator(&opts).map_err(|e| e.to_string())?;
    let sample = generator.generate().map_err(|e| e.to_string())?;
    let ok = generator.matches(&sample);

    if opts.json {
        let payload = json!({
            "ok": ok,
            "config": generator.settings().config(),
            "pattern": generator.pattern().as_str(),
            "sample_id": sample,
        });
        println!(
            "{}",
            serde_json::to_string(&payload).map_err(|e| e.to_string())?
        );
    } else {
        println!(
            "ok={} sample={}",
            if ok { "true" } else { "false" },
            sample
        );
    }

    if ok {
        Ok(())
    } else {
        Err("healthcheck failed".to_string())
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("segid=warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() {
    init_logging();

    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() {
        print_help();
        process::exit(2);
    }

    if args[0] == "-h" || args[0] == "--help" || args[0] == "help" {
        print_help();
        return;
    }

    let cmd = args[0].as_str();
    let rest = &args[1..];

    let res = match cmd {
        "next" => run_next(rest),
        "stream" => run_stream(rest),
        "validate" => run_validate(rest),
        "check" => run_check(rest),
        "healthcheck" => run_healthcheck(rest),
        _ => {
            eprintln!("error: unknown command: {cmd}");
            print_help();
            process::exit(2);
        }
    };

    if let Err(err) = res {
        tracing::debug!(command = cmd, error = %err, "command failed");
        eprintln!("error: {err}");
        process::exit(1);
    }
}
