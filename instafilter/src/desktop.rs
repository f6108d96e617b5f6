#[tokio::main]
async fn main() {
    extern crate instafilter;

    if let Err(e) = instafilter::desktop_main().await {
        log::error!("{e:?}");
        eprintln!("instafilter: {e:#}");
        std::process::exit(1);
    }
}
