use pfx_kvs::Kvs;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut kvs = Kvs::new();

    for i in 0..100_000 {
        kvs.insert(&format!("word {i}"), i);
    }

    kvs.extend([
        ("honey", 20),
        ("honey", 10),
        ("honeycomb", 30),
        ("honeybee", 40),
        ("honeymoon", 50),
        ("honesty", 60),
        ("🐝hive", 70),
    ]);

    println!("{} values under {} keys", kvs.len(), kvs.key_count());

    for prefix in ["honey", "hone", "h", "🐝", "word 9999"] {
        let mut values = kvs.prefix_search(prefix);
        values.sort_unstable();
        println!("{prefix:?} => {values:?}");
    }
}
