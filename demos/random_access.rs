use std::net::{Ipv4Addr, Ipv6Addr};

use asn_radix::*;

use ipnet::{Ipv4Net, Ipv6Net};
use rand::prelude::*;

fn main() {
    env_logger::init();

    let mut tree: RadixTree<u64> = RadixTree::new();

    let mut rng = thread_rng();

    for _ in 0..1_000_000 {
        let network: Network = if rng.gen_bool(0.8) {
            Ipv4Net::new(Ipv4Addr::new(rng.gen(), 0, 0, 0), rng.gen_range(1..=8))
                .unwrap()
                .into()
        } else {
            Ipv6Net::new(Ipv6Addr::new(rng.gen(), 0, 0, 0, 0, 0, 0, 0), rng.gen_range(1..=16))
                .unwrap()
                .into()
        };

        if rng.gen_bool(0.7) {
            let record = tree.add(network);
            record.set_asn(rng.gen_range(1..65536));
            *record.data_mut().get_or_insert(0) += 1;
        } else {
            let _ = tree.delete(&network);
        }
    }

    let mut cursor = tree.cursor();
    let mut total = 0;
    while let Ok(Some(record)) = cursor.next(&tree) {
        total += record.data().unwrap_or(0);
    }
    println!(
        "{} networks ({} IPv4, {} IPv6), {} additions still in the tree",
        tree.len(),
        tree.v4().len(),
        tree.v6().len(),
        total
    );
    if let Some(record) = tree.search_best(&"10.1.2.3".parse().unwrap()) {
        println!("10.1.2.3 is originated by {}", to_asdot(record.asn()));
    }
}
