//! ookit - class composition demo
//!
//! Builds a small class hierarchy, exercises super dispatch, class members
//! and foreign type conversion, and prints the results.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use ookit::{convert, ClassDef, ClassError, ClassRegistry, Config, ForeignType, Value};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// ookit class composition demo
#[derive(Parser, Debug)]
#[command(name = "ookit", version, about = "Build and inspect a demo class hierarchy")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Expose class members inside instance methods
    #[arg(long)]
    expose_class_members: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if args.expose_class_members {
        config.options.expose_class_members = true;
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut registry = ClassRegistry::with_defaults(config.options);
    build_hierarchy(&mut registry)?;

    for name in registry.names() {
        println!("{:<10} {}", name, registry.get_chain(&name).join(" -> "));
    }

    let puppy = registry
        .get("Puppy")
        .ok_or_else(|| anyhow::anyhow!("Puppy is not defined"))?;
    let rex = puppy.new_instance(&[Value::from("Rex")])?;
    println!("{}", rex.call("speak", &[])?.as_str().unwrap_or_default());
    println!("{}", rex.call("describe", &[])?.as_str().unwrap_or_default());

    let robot = registry
        .get("Robot")
        .ok_or_else(|| anyhow::anyhow!("Robot is not defined"))?;
    let unit = robot.new_instance(&[Value::from("R2")])?;
    println!("{}", unit.call("speak", &[])?.as_str().unwrap_or_default());

    info!(classes = registry.names().len(), "demo complete");
    Ok(())
}

fn build_hierarchy(registry: &mut ClassRegistry) -> Result<(), ClassError> {
    let mut animal = ClassDef::anonymous();
    animal.set_field("name", "");
    animal.set_class_value("kingdom", "animalia");
    animal.add_method("init", |scope, args| {
        scope.set("name", args.first().cloned().unwrap_or_default());
        Ok(Value::null())
    });
    animal.add_method("speak", |scope, _| {
        let name = scope.get("name").unwrap_or_default();
        Ok(Value::from(format!("{} makes a sound", name.as_str().unwrap_or("?"))))
    });
    animal.add_method("describe", |scope, _| {
        // unqualified lookup needs exposed class members
        let kingdom = scope
            .get("kingdom")
            .or_else(|| scope.class().class_value("kingdom"))
            .unwrap_or_default();
        Ok(Value::from(format!(
            "{} of kingdom {}",
            scope.class(),
            kingdom.as_str().unwrap_or("?")
        )))
    });
    registry.define("Animal", None, animal)?;

    let mut dog = ClassDef::anonymous();
    dog.add_method("speak", |scope, args| {
        let base = scope.super_call(args)?;
        Ok(Value::from(format!("{}, woof", base.as_str().unwrap_or_default())))
    });
    registry.define("Dog", Some("Animal"), dog)?;

    let mut puppy = ClassDef::anonymous();
    puppy.add_method("speak", |scope, args| {
        let base = scope.super_call(args)?;
        Ok(Value::from(format!("{} (squeaky)", base.as_str().unwrap_or_default())))
    });
    registry.define("Puppy", Some("Dog"), puppy)?;

    let robot = ForeignType::new("Robot", |this, args| {
        this.set("serial", args.first().cloned().unwrap_or_default());
        Ok(())
    });
    robot.add_method("speak", |this, _| {
        let serial = this.get("serial").unwrap_or_default();
        Ok(Value::from(format!("{} beeps", serial.as_str().unwrap_or("?"))))
    });
    registry.register(convert(&robot, "device", registry.defaults()))?;

    Ok(())
}
