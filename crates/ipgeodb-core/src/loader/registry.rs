// crates/ipgeodb-core/src/loader/registry.rs

/// The five Regional Internet Registries publishing delegated-stats files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Registry {
    Apnic,
    Afrinic,
    Arin,
    Lacnic,
    RipeNcc,
}

impl Registry {
    /// Processing order of the default build. Ranges keep this order in the
    /// table, which decides precedence on overlap.
    pub const ALL: [Registry; 5] = [
        Registry::Apnic,
        Registry::Afrinic,
        Registry::Arin,
        Registry::Lacnic,
        Registry::RipeNcc,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Registry::Apnic => "apnic",
            Registry::Afrinic => "afrinic",
            Registry::Arin => "arin",
            Registry::Lacnic => "lacnic",
            Registry::RipeNcc => "ripencc",
        }
    }

    /// Latest delegated-stats file of this registry.
    pub fn url(&self) -> &'static str {
        match self {
            Registry::Apnic => "https://ftp.apnic.net/apnic/stats/apnic/delegated-apnic-latest",
            Registry::Afrinic => {
                "https://ftp.afrinic.net/pub/stats/afrinic/delegated-afrinic-extended-latest"
            }
            Registry::Arin => "https://ftp.arin.net/pub/stats/arin/delegated-arin-extended-latest",
            Registry::Lacnic => {
                "https://ftp.lacnic.net/pub/stats/lacnic/delegated-lacnic-extended-latest"
            }
            Registry::RipeNcc => {
                "https://ftp.ripe.net/pub/stats/ripencc/delegated-ripencc-extended-latest"
            }
        }
    }

    /// Source URLs of [`Registry::ALL`], in order.
    pub fn default_sources() -> Vec<String> {
        Self::ALL.iter().map(|r| r.url().to_string()).collect()
    }
}

impl std::fmt::Display for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
