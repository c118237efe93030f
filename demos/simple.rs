use rskiplist::{Options, SkipMap};
use tracing_subscriber::EnvFilter;

fn show(map: &SkipMap<i32, &str>, key: i32) {
    match map.search(&key) {
        Some(v) => println!("search key={}: {}", key, v),
        None => println!("search key={}: not found", key),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut map = match SkipMap::new(Options::default()) {
        Ok(map) => map,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    println!("insert key=3, value='hello'");
    map.insert(3, "hello");
    show(&map, 3);
    println!("insert key=6, value='hello2'");
    map.insert(6, "hello2");
    println!("insert key=1, value='world'");
    map.insert(1, "world");
    show(&map, 1);
    show(&map, 2);

    println!("iter skipmap:");
    for v in map.values() {
        println!("{}", v);
    }

    for key in [3, 6, 1, 1] {
        println!("delete key {}", key);
        map.delete(&key);
        show(&map, key);
    }

    println!("iter empty skipmap:");
    for v in map.values() {
        println!("{}", v);
    }
    println!("current level: {}", map.current_level());
}
