//! Runs the intersection guidance engine over a road model described in JSON and prints every
//! classified approach. Mostly useful for auditing how a map digitization will be announced.

#[macro_use]
extern crate log;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use structopt::StructOpt;

use geom::LonLat;
use guidance::{
    ConnectedRoad, EdgeID, GuidanceConfig, GuidanceEngine, IntersectionGenerator, NodeID,
    RoadGraph, SegregatedCarriagewayDetector, SuffixTable,
};

#[derive(StructOpt)]
#[structopt(name = "guidance-cli", about = "Intersection guidance tools")]
enum Command {
    /// Classifies every legal approach in a road model and prints the results as JSON
    Classify {
        /// The path to a JSON road model: {"nodes": [[lon, lat], ...], "roads": [{"from": 0,
        /// "to": 1, "name": "...", "oneway": false, "roundabout": false}, ...],
        /// "name_suffixes": ["Street", ...]}
        #[structopt()]
        model: String,
        /// The path to a JSON guidance config, overriding the defaults
        #[structopt(long)]
        config: Option<String>,
    },
    /// Prints the default guidance configuration as JSON
    DumpConfig,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Command::from_args() {
        Command::Classify { model, config } => classify(&model, config.as_deref()),
        Command::DumpConfig => {
            println!("{}", serde_json::to_string_pretty(&GuidanceConfig::default())?);
            Ok(())
        }
    }
}

#[derive(Deserialize)]
struct RawModel {
    nodes: Vec<[f64; 2]>,
    roads: Vec<RawRoad>,
    #[serde(default)]
    name_suffixes: Vec<String>,
}

#[derive(Deserialize)]
struct RawRoad {
    from: usize,
    to: usize,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    oneway: bool,
    #[serde(default)]
    roundabout: bool,
}

#[derive(Serialize)]
struct ClassifiedApproach {
    node: NodeID,
    via: EdgeID,
    roads: Vec<ConnectedRoad>,
}

fn classify(model_path: &str, config_path: Option<&str>) -> Result<()> {
    let raw: RawModel = serde_json::from_slice(
        &fs_err::read(model_path).context("reading the road model")?,
    )
    .context("parsing the road model")?;
    let config: GuidanceConfig = match config_path {
        Some(path) => serde_json::from_slice(&fs_err::read(path).context("reading the config")?)
            .context("parsing the config")?,
        None => GuidanceConfig::default(),
    };

    let (graph, suffixes) = build_graph(raw)?;
    let generator = IntersectionGenerator::new(&graph);
    let detector = SegregatedCarriagewayDetector::new(&graph, &config);
    let engine = GuidanceEngine::new(&graph, &suffixes, &detector, &generator, &config);

    let mut results = Vec::new();
    for via in graph.all_edges() {
        // wrong-way arcs aren't approachable
        if graph.edge_data(via).wrong_way {
            continue;
        }
        let classified = engine.process(graph.edge(via).src, via);
        results.push(ClassifiedApproach {
            node: graph.target(via),
            via,
            roads: classified.roads,
        });
    }
    info!("classified {} approaches across {} nodes", results.len(), graph.num_nodes());

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

fn build_graph(raw: RawModel) -> Result<(RoadGraph, SuffixTable)> {
    let mut graph = RoadGraph::new();
    for [lon, lat] in &raw.nodes {
        graph.add_node(LonLat::new(*lon, *lat));
    }
    for (i, road) in raw.roads.iter().enumerate() {
        if road.from >= raw.nodes.len() || road.to >= raw.nodes.len() {
            bail!("road {} references a missing node", i);
        }
        if road.from == road.to {
            bail!("road {} is a self-loop", i);
        }
        graph.add_road(
            NodeID(road.from),
            NodeID(road.to),
            road.name.as_deref(),
            road.oneway,
            road.roundabout,
        );
    }
    Ok((graph, SuffixTable::new(raw.name_suffixes)))
}
