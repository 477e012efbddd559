//! Example of building, serializing and lazily re-reading a PathMap.
//!
//! cargo run --package pathmap --example lookup

use pathmap::{BloomFilter, BloomParams, PathMap, PathTrie};
use serde_json::json;

fn main() -> Result<(), pathmap::Error> {
    let catalogue = [
        ("/women/trousers/yoga-pants/black", json!(1)),
        ("/women/trousers/yoga-pants/blue", json!(2)),
        ("/women/trousers/zip-off-trousers/blue", json!(2)),
        ("/women/trousers/zip-off-trousers/black", json!(1)),
    ];

    let mut trie = PathTrie::new();
    for (path, payload) in &catalogue {
        trie.insert(path, payload.clone())?;
    }

    let text = trie.stringify()?;
    println!("--- serialized ({} bytes) ---", text.len());
    print!("{text}");

    let map = PathMap::from_slice(text.as_bytes())?;
    println!("--- lookups ---");
    println!(
        "/women/trousers/yoga-pants/black -> {:?}",
        map.find("/women/trousers/yoga-pants/black")?
    );
    println!(
        "/women/trousers/cargo-pants      -> {:?}",
        map.find("/women/trousers/cargo-pants")?
    );

    let mut bloom = BloomFilter::new(BloomParams::new(catalogue.len() as u64).fp_rate(0.01))?;
    for (path, _) in &catalogue {
        bloom.add(path);
    }
    println!("--- bloom ({} bits) ---", bloom.bit_len());
    println!("{}", bloom.to_base64());

    Ok(())
}
