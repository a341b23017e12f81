// crates/zettel-core/examples/playground.rs
// Run with: cargo run --example playground

use std::sync::Arc;

use tempfile::tempdir;
use zettel_core::config::StoreConfig;
use zettel_core::{ChainPlace, ConstantPlace, Content, DirectoryPlace, Meta, Place, Zettel, Zid};

fn main() {
    println!("Zettel storage core playground\n");

    println!("=== Zid ===");
    let a = Zid::from_now();
    let b = Zid::from_now();
    println!("minted: {a}, {b} (strictly greater: {})", b > a);
    println!("parse roundtrip: {}", Zid::parse(a.to_string()).unwrap() == a);

    println!("\n=== Meta ===");
    let mut meta = Meta::new(a);
    meta.set("title", "Playground note").unwrap();
    meta.set("tags", "#demo #playground").unwrap();
    meta.set("syntax", "zmk").unwrap();
    println!("title: {}", meta.title());
    println!("tags: {:?}", meta.get_tag_set("tags"));
    println!("front pairs: {:?}", meta.front_pairs());

    println!("\n=== ConstantPlace ===");
    let constant = ConstantPlace::new();
    constant.start().unwrap();
    let config_zid = Zid::parse("00000000000001").unwrap();
    println!("builtin title: {}", constant.get_meta(config_zid).unwrap().title());

    println!("\n=== DirectoryPlace + ChainPlace ===");
    let dir = tempdir().unwrap();
    let directory: Arc<dyn Place> = Arc::new(DirectoryPlace::new(
        dir.path().to_path_buf(),
        StoreConfig::default(),
        false,
    ));
    let constant: Arc<dyn Place> = Arc::new(ConstantPlace::new());
    let chain = ChainPlace::new(vec![directory.clone(), constant]);
    chain.start().unwrap();

    let zid = directory
        .create_zettel(Zettel::new(meta, Content::from("Hello from the playground.")))
        .unwrap();
    println!("created {zid}");

    for m in chain.select_meta(None, None).unwrap().into_iter().take(3) {
        println!("  {} — {}", m.zid(), m.title());
    }

    chain.stop().unwrap();
    println!("\ndone.");
}
