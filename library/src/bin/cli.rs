use imagecalc::LibraryError;
use imagecalc::run;

fn main() -> Result<(), LibraryError> {
    env_logger::init();
    run(std::env::args().collect())
}
