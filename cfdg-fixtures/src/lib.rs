//! Sample `.cfdg` grammars shared by `cfdg-core`'s test suite.

pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("{}/{name}", env!("FIXTURES_PATH")))
        .unwrap_or_else(|e| panic!("failed to read fixture {name}: {e}"))
}

#[cfg(test)]
mod tests {
    #[test]
    fn every_fixture_is_readable_utf8() {
        for file in walkdir::WalkDir::new(env!("FIXTURES_PATH"))
            .into_iter()
            .map(|file| file.unwrap())
            .filter(|file| file.file_name().to_string_lossy().ends_with(".cfdg"))
        {
            std::fs::read_to_string(file.path()).unwrap();
        }
    }
}
