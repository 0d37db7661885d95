use schemaflow::model::{example_graph, Graph};
use schemaflow::storage::SchemaDocument;
use schemaflow::{compiler, parser, serializer, validate};
use std::env;
use std::fs;
use std::process;

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} <command> [input] [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  compile <graph.json>        Compile a graph snapshot to DSL text");
    eprintln!("  parse <schema.prisma>       Parse DSL text into a graph snapshot");
    eprintln!("  serialize <graph.json>      Convert a graph to its storage document");
    eprintln!("  deserialize <doc.json>      Convert a storage document to a graph");
    eprintln!("  validate <doc.json>         Check a storage document for consistency");
    eprintln!("  example                     Print the compiled User/Task starter schema");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <file>   Output file (default: stdout)");
    process::exit(1);
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        usage(&args[0]);
    }

    let command = args[1].as_str();
    let mut input_path: Option<String> = None;
    let mut output_path: Option<String> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => {
                i += 1;
                if i < args.len() {
                    output_path = Some(args[i].clone());
                }
            }
            _ if input_path.is_none() => {
                input_path = Some(args[i].clone());
            }
            other => {
                eprintln!("Unknown option: {other}");
                process::exit(1);
            }
        }
        i += 1;
    }

    let output = match command {
        "example" => compiler::compile(&example_graph()).text,
        "compile" => {
            let graph = read_graph(&args[0], input_path.as_deref());
            let compiled = compiler::compile(&graph);
            for warning in &compiled.warnings {
                eprintln!("warning: {warning}");
            }
            compiled.text
        }
        "parse" => {
            let text = read_input(&args[0], input_path.as_deref());
            let graph = match parser::parse(&text) {
                Ok(g) => g,
                Err(e) => {
                    eprintln!("Parse error: {e}");
                    process::exit(1);
                }
            };
            to_json(&graph)
        }
        "serialize" => {
            let graph = read_graph(&args[0], input_path.as_deref());
            to_json(&serializer::serialize(&graph))
        }
        "deserialize" => {
            let doc = read_document(&args[0], input_path.as_deref());
            to_json(&serializer::deserialize(&doc))
        }
        "validate" => {
            let doc = read_document(&args[0], input_path.as_deref());
            match validate::validate(&doc) {
                Ok(()) => "ok\n".to_string(),
                Err(e) => {
                    eprintln!("Validation failed: {e}");
                    process::exit(1);
                }
            }
        }
        _ => usage(&args[0]),
    };

    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(&path, &output) {
                eprintln!("Failed to write {path}: {e}");
                process::exit(1);
            }
        }
        None => print!("{output}"),
    }
}

fn read_input(program: &str, path: Option<&str>) -> String {
    let path = match path {
        Some(p) => p,
        None => usage(program),
    };
    match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {path}: {e}");
            process::exit(1);
        }
    }
}

// Derived struct deserializers also accept a sequence when every field has
// a default, so the top level must be checked before decoding.
fn read_object(program: &str, path: Option<&str>, what: &str) -> serde_json::Value {
    let raw = read_input(program, path);
    let value: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Invalid {what} JSON: {e}");
            process::exit(1);
        }
    };
    if !value.is_object() {
        eprintln!("Invalid {what} JSON: expected a JSON object at the top level");
        process::exit(1);
    }
    value
}

fn read_graph(program: &str, path: Option<&str>) -> Graph {
    match serde_json::from_value(read_object(program, path, "graph")) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("Invalid graph JSON: {e}");
            process::exit(1);
        }
    }
}

fn read_document(program: &str, path: Option<&str>) -> SchemaDocument {
    match serde_json::from_value(read_object(program, path, "document")) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Invalid document JSON: {e}");
            process::exit(1);
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    match serde_json::to_string_pretty(value) {
        Ok(mut s) => {
            s.push('\n');
            s
        }
        Err(e) => {
            eprintln!("Failed to encode JSON: {e}");
            process::exit(1);
        }
    }
}
