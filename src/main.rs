use httpbench::entry;
use httpbench::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
