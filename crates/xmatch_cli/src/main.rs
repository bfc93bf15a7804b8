use clap::{Parser, Subcommand};
use flexi_logger::{Logger, LoggerHandle};
use log::debug;
use xmatch_core::{Epoch, EpochRange, ProperMotionRow, propagate_row};
use xmatch_frames::angular_separation_arcsec;
use xmatch_time::mjd_to_year;

#[derive(Parser)]
#[command(name = "xmatch", about = "Catalog cross-match epoch tools")]
struct Cli {
    /// Log level or filter spec (e.g. "debug", "xmatch_core=trace")
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert Modified Julian Dates to fractional calendar years
    MjdToYear {
        /// One or more MJDs
        #[arg(required = true, allow_negative_numbers = true)]
        mjd: Vec<f64>,
    },
    /// Move one position between epochs using its proper motion
    Propagate {
        /// Right ascension in degrees
        #[arg(long, allow_negative_numbers = true)]
        ra: f64,
        /// Declination in degrees
        #[arg(long, allow_negative_numbers = true)]
        dec: f64,
        /// Proper motion in RA (mu_alpha * cos dec), mas/yr
        #[arg(long, allow_negative_numbers = true)]
        pmra: f64,
        /// Proper motion in Dec, mas/yr
        #[arg(long, allow_negative_numbers = true)]
        pmdec: f64,
        /// Source epoch as a fractional year
        #[arg(long, conflicts_with = "from_mjd")]
        from_year: Option<f64>,
        /// Source epoch as MJD
        #[arg(long)]
        from_mjd: Option<f64>,
        /// Target epoch as a fractional year
        #[arg(long, conflicts_with = "to_mjd")]
        to_year: Option<f64>,
        /// Target epoch as MJD
        #[arg(long)]
        to_mjd: Option<f64>,
        /// Mark the proper motion as untrusted
        #[arg(long)]
        bad_pm: bool,
    },
    /// Angular separation between two positions, in arcseconds
    Separation {
        /// First position RA (deg)
        #[arg(allow_negative_numbers = true)]
        ra1: f64,
        /// First position Dec (deg)
        #[arg(allow_negative_numbers = true)]
        dec1: f64,
        /// Second position RA (deg)
        #[arg(allow_negative_numbers = true)]
        ra2: f64,
        /// Second position Dec (deg)
        #[arg(allow_negative_numbers = true)]
        dec2: f64,
    },
}

fn main() {
    let cli = Cli::parse();
    let _logger = setup_logging(&cli.log_level);

    match cli.command {
        Commands::MjdToYear { mjd } => {
            for m in mjd {
                println!("{m} -> {:.9}", mjd_to_year(m));
            }
        }

        Commands::Propagate {
            ra,
            dec,
            pmra,
            pmdec,
            from_year,
            from_mjd,
            to_year,
            to_mjd,
            bad_pm,
        } => {
            let row = ProperMotionRow {
                ra,
                dec,
                pmra,
                pmdec,
                goodpm: !bad_pm,
            };
            let range = EpochRange {
                from: epoch_arg(from_year, from_mjd),
                to: epoch_arg(to_year, to_mjd),
            };
            debug!("propagating {row:?} over {range:?}");
            match propagate_row(&row, &range) {
                Ok((ra_new, dec_new)) => {
                    println!("RA:  {ra_new:.9} deg");
                    println!("Dec: {dec_new:.9} deg");
                }
                Err(e) => {
                    eprintln!("Propagation failed: {e}");
                    std::process::exit(1);
                }
            }
        }

        Commands::Separation {
            ra1,
            dec1,
            ra2,
            dec2,
        } => {
            let sep = angular_separation_arcsec(ra1, dec1, ra2, dec2);
            println!("{sep:.6} arcsec");
        }
    }
}

fn epoch_arg(year: Option<f64>, mjd: Option<f64>) -> Option<Epoch> {
    match (year, mjd) {
        (_, Some(mjd)) => Some(Epoch::Mjd(mjd)),
        (Some(year), None) => Some(Epoch::Year(year)),
        (None, None) => None,
    }
}

fn setup_logging(spec: &str) -> LoggerHandle {
    Logger::try_with_env_or_str(spec)
        .and_then(|logger| logger.log_to_stderr().start())
        .unwrap_or_else(|e| {
            eprintln!("Failed to initialise logging: {e}");
            std::process::exit(1);
        })
}
