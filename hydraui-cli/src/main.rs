use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use serde_json::Value;

use hydraui::domain::{FieldState, ParameterSave, TreeNode};
use hydraui::prelude::*;
use hydraui::schema::{decode_tree, sniff_value, wire_value};

#[derive(Debug, Parser)]
#[command(
    name = "hydraui",
    version,
    about = "Browse, edit and deploy hydra-engine configuration trees"
)]
struct Cli {
    /// Base URL of the hydra-engine backend
    #[arg(
        long = "base-url",
        value_name = "URL",
        default_value = "http://localhost:8000"
    )]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the configuration tree as an outline
    Tree {
        /// Use the wizard tree instead of the settings tree
        #[arg(long)]
        wizard: bool,
    },
    /// Print one form with its fields and current values
    Form {
        /// Slash-separated path of the form
        url: String,
    },
    /// Search forms, groups and fields
    Search { query: String },
    /// Commit a single value to a form
    Set {
        /// Slash-separated path of the form
        form: String,
        /// Dotted input path of the field
        input_url: String,
        /// New value (sniffed: int, float, bool, datetime, else string)
        value: String,
        /// Identifier of the owning configuration file
        #[arg(long = "file-id", default_value = "")]
        file_id: String,
    },
    /// Poll deployment progress for all sites
    DeployStatus,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Tree { wizard } => {
            let raw = if wizard {
                WizardApi::new(&cli.base_url)
                    .fetch_tree()
                    .await
                    .map_err(|e| eyre!(e))?
            } else {
                HydraApi::new(&cli.base_url)
                    .fetch_tree()
                    .await
                    .map_err(|e| eyre!(e))?
            };
            let tree = decode_tree(&raw).map_err(|e| eyre!(e))?;
            print_outline(&tree, 0);
        }
        Command::Form { url } => {
            let raw = HydraApi::new(&cli.base_url)
                .fetch_node(&url)
                .await
                .map_err(|e| eyre!(e))?;
            let form = decode_tree(&raw).map_err(|e| eyre!(e))?;
            print_form(&form);
        }
        Command::Search { query } => {
            let results = HydraApi::new(&cli.base_url)
                .search(&query)
                .await
                .map_err(|e| eyre!(e))?;
            if results.is_empty() {
                println!("no matches for '{query}'");
            }
            for entry in results {
                println!(
                    "{:?}\t{}\t{}",
                    entry.entity, entry.display_name, entry.output_url
                );
            }
        }
        Command::Set {
            form,
            input_url,
            value,
            file_id,
        } => {
            let parsed = sniff_value(&Value::String(value));
            let item = ParameterSave {
                input_url,
                value: wire_value(&parsed),
                file_id,
            };
            HydraApi::new(&cli.base_url)
                .set_values(&form, &[item])
                .await
                .map_err(|e| eyre!(e))?;
            println!("value committed to {form}");
        }
        Command::DeployStatus => {
            let sites = WizardApi::new(&cli.base_url)
                .check_deploy()
                .await
                .map_err(|e| eyre!(e))?;
            if sites.is_empty() {
                return Err(eyre!("backend reported no sites"));
            }
            for site in sites {
                println!(
                    "{}\tstep {}\t{:?}",
                    if site.name.is_empty() { "-" } else { &site.name },
                    site.step_number,
                    site.status
                );
            }
        }
    }

    Ok(())
}

fn print_outline(node: &TreeNode, depth: usize) {
    if !node.name.is_empty() {
        println!(
            "{}{} ({} fields)",
            "  ".repeat(depth),
            node.display_label(),
            node.leaf_count()
        );
    }
    for child in &node.children {
        print_outline(child, depth + 1);
    }
}

fn print_form(form: &TreeNode) {
    println!("{}", form.display_label());
    if let Some(description) = &form.description {
        println!("  {description}");
    }
    for group in &form.field_groups {
        for (key, field) in group {
            print_field(key, field);
        }
    }
    for child in &form.children {
        print_form(child);
    }
}

fn print_field(key: &str, field: &FieldState) {
    let mut flags = Vec::new();
    if field.read_only {
        flags.push("read-only");
    }
    if field.disabled {
        flags.push("disabled");
    }
    if !field.active {
        flags.push("inactive");
    }
    let suffix = if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(", "))
    };
    println!("  {key} = {}{suffix}", field.display_value());
}
