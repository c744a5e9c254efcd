use clap::{Parser, Subcommand};
use heatmap::{
    app::{self, HeatmapAppError},
    collaborator::{NominatimGeocoder, OtpIsochroneProvider},
    config::{HeatmapConfiguration, LocationConfig},
    output::HeatmapOutputFormat,
};
use heatmap_core::algorithm::EmptyMergePolicy;
use std::path::Path;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct HeatmapAppArguments {
    #[command(subcommand)]
    app: App,
}

#[derive(Subcommand)]
pub enum App {
    /// compute the average commute isochrone of a set of addresses
    Run {
        #[arg(long, help = "path to .toml or .json file with heatmap parameters")]
        configuration_file: Option<String>,
        #[arg(
            long = "address",
            help = "address to include, may be repeated. appended to any configured locations"
        )]
        addresses: Vec<String>,
        #[arg(long, help = "number of aggregation workers, defaults to available parallelism")]
        workers: Option<usize>,
        #[arg(long, help = "output path for the heatmap")]
        output_file: Option<String>,
        #[arg(long, value_enum, help = "geometry format of the output file")]
        output_format: Option<HeatmapOutputFormat>,
        #[arg(
            long,
            value_parser = parse_empty_merge_policy,
            help = "behavior when two isochrones share no area: fail or carry_forward"
        )]
        empty_merge_policy: Option<EmptyMergePolicy>,
    },
    /// print the default configuration as TOML
    Template,
}

fn parse_empty_merge_policy(s: &str) -> Result<EmptyMergePolicy, String> {
    match s {
        "fail" => Ok(EmptyMergePolicy::Fail),
        "carry_forward" => Ok(EmptyMergePolicy::CarryForward),
        other => Err(format!(
            "unknown empty merge policy '{other}', expected 'fail' or 'carry_forward'"
        )),
    }
}

pub fn run(app: &App) -> Result<(), HeatmapAppError> {
    match app {
        App::Run {
            configuration_file,
            addresses,
            workers,
            output_file,
            output_format,
            empty_merge_policy,
        } => {
            let mut conf = match configuration_file {
                None => Ok(HeatmapConfiguration::default()),
                Some(f) => {
                    log::info!("reading heatmap configuration from {f}");
                    HeatmapConfiguration::try_from(f)
                }
            }?;
            conf.locations
                .extend(addresses.iter().map(|a| LocationConfig::new(a)));
            if let Some(w) = workers {
                conf.aggregation.workers = Some(*w);
            }
            if let Some(f) = output_file {
                conf.output_file = Some(f.clone());
            }
            if let Some(f) = output_format {
                conf.output_format = *f;
            }
            if let Some(p) = empty_merge_policy {
                conf.aggregation.empty_merge_policy = *p;
            }

            let geocoder = NominatimGeocoder::new(&conf.geocoder)?;
            let provider = OtpIsochroneProvider::new(&conf.router)?;
            let result = app::run(&conf, &geocoder, &provider)?;

            let out_file = conf.get_output_file();
            conf.output_format
                .write_file(&result.isochrone, Path::new(&out_file))?;
            if result.summary.workers == 0 {
                log::info!("single isochrone computed, no merges needed");
            } else {
                log::info!(
                    "merged {} isochrones in {} merges using {} workers",
                    result.summary.inputs,
                    result.summary.merges,
                    result.summary.workers
                );
            }
            eprintln!("finished. heatmap written to {out_file}");
            Ok(())
        }
        App::Template => {
            let template = toml::to_string_pretty(&HeatmapConfiguration::default())
                .map_err(|e| HeatmapAppError::ConfigurationError(e.to_string()))?;
            println!("{template}");
            Ok(())
        }
    }
}

fn main() {
    env_logger::init();
    let args = HeatmapAppArguments::parse();
    if let Err(e) = run(&args.app) {
        log::error!("heatmap failed: {e}");
        std::process::exit(1);
    }
}
