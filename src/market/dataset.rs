//! Historical annual return dataset
//!
//! The dataset is an external, read-only resource: per-class annual returns
//! plus a CPI inflation figure for each historical year. A US 1928-2023 table
//! is embedded so the engine works without data files; [`crate::market::loader`]
//! can replace it from CSV.

use serde::{Deserialize, Serialize};

use super::AssetClass;

/// One historical year: per-class total returns and CPI inflation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalYear {
    pub year: u16,
    /// Equity total return (dividends reinvested)
    pub stocks: f64,
    /// 10-year Treasury total return
    pub bonds: f64,
    /// 3-month T-bill return
    pub cash: f64,
    /// Year-over-year CPI change
    pub inflation: f64,
}

impl HistoricalYear {
    /// Return for one asset class in this year
    pub fn class_return(&self, class: AssetClass) -> f64 {
        match class {
            AssetClass::Stocks => self.stocks,
            AssetClass::Bonds => self.bonds,
            AssetClass::Cash => self.cash,
        }
    }

    /// Allocation-weighted blend of this year's class returns.
    /// `weights` is indexed in [`AssetClass::ALL`] order.
    pub fn blended_return(&self, weights: &[f64]) -> f64 {
        AssetClass::ALL
            .iter()
            .zip(weights)
            .map(|(class, w)| w * self.class_return(*class))
            .sum()
    }
}

/// A multi-year historical dataset for bootstrap sampling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalDataset {
    years: Vec<HistoricalYear>,
}

impl HistoricalDataset {
    pub fn new(years: Vec<HistoricalYear>) -> Self {
        Self { years }
    }

    /// Embedded US annual history, 1928-2023: S&P 500 total return, 10-year
    /// Treasury total return, 3-month T-bill, CPI
    pub fn default_us() -> Self {
        Self::new(
            US_ANNUAL_HISTORY
                .iter()
                .map(|&(year, stocks, bonds, cash, inflation)| HistoricalYear {
                    year,
                    stocks,
                    bonds,
                    cash,
                    inflation,
                })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn years(&self) -> &[HistoricalYear] {
        &self.years
    }

    pub fn year_at(&self, index: usize) -> &HistoricalYear {
        &self.years[index]
    }

    /// First and last calendar year covered
    pub fn span(&self) -> Option<(u16, u16)> {
        match (self.years.first(), self.years.last()) {
            (Some(first), Some(last)) => Some((first.year, last.year)),
            _ => None,
        }
    }
}

/// (year, stocks, bonds, cash, inflation)
const US_ANNUAL_HISTORY: &[(u16, f64, f64, f64, f64)] = &[
    (1928, 0.4381, 0.0084, 0.0308, -0.0170),
    (1929, -0.0830, 0.0420, 0.0316, 0.0060),
    (1930, -0.2512, 0.0454, 0.0239, -0.0640),
    (1931, -0.4384, -0.0256, 0.0107, -0.0930),
    (1932, -0.0864, 0.0879, 0.0088, -0.1030),
    (1933, 0.4998, 0.0186, 0.0052, 0.0080),
    (1934, -0.0119, 0.0796, 0.0029, 0.0150),
    (1935, 0.4674, 0.0447, 0.0017, 0.0300),
    (1936, 0.3194, 0.0502, 0.0017, 0.0140),
    (1937, -0.3534, 0.0138, 0.0028, 0.0290),
    (1938, 0.2928, 0.0421, 0.0007, -0.0280),
    (1939, -0.0110, 0.0441, 0.0005, 0.0000),
    (1940, -0.1067, 0.0540, 0.0004, 0.0070),
    (1941, -0.1277, -0.0202, 0.0013, 0.0990),
    (1942, 0.1917, 0.0229, 0.0034, 0.0900),
    (1943, 0.2506, 0.0249, 0.0038, 0.0300),
    (1944, 0.1903, 0.0258, 0.0038, 0.0230),
    (1945, 0.3582, 0.0380, 0.0038, 0.0220),
    (1946, -0.0843, 0.0313, 0.0038, 0.1810),
    (1947, 0.0520, 0.0092, 0.0060, 0.0880),
    (1948, 0.0570, 0.0195, 0.0105, 0.0300),
    (1949, 0.1830, 0.0466, 0.0112, -0.0210),
    (1950, 0.3081, 0.0043, 0.0120, 0.0590),
    (1951, 0.2368, -0.0030, 0.0152, 0.0600),
    (1952, 0.1815, 0.0227, 0.0172, 0.0080),
    (1953, -0.0121, 0.0414, 0.0189, 0.0070),
    (1954, 0.5256, 0.0329, 0.0095, -0.0070),
    (1955, 0.3260, -0.0134, 0.0172, 0.0040),
    (1956, 0.0744, -0.0226, 0.0262, 0.0300),
    (1957, -0.1046, 0.0680, 0.0322, 0.0290),
    (1958, 0.4372, -0.0210, 0.0178, 0.0180),
    (1959, 0.1206, -0.0265, 0.0326, 0.0170),
    (1960, 0.0034, 0.1164, 0.0293, 0.0140),
    (1961, 0.2664, 0.0206, 0.0234, 0.0070),
    (1962, -0.0881, 0.0569, 0.0277, 0.0130),
    (1963, 0.2261, 0.0168, 0.0312, 0.0160),
    (1964, 0.1642, 0.0373, 0.0354, 0.0100),
    (1965, 0.1240, 0.0072, 0.0393, 0.0190),
    (1966, -0.0997, 0.0291, 0.0476, 0.0350),
    (1967, 0.2380, -0.0158, 0.0421, 0.0300),
    (1968, 0.1081, 0.0327, 0.0530, 0.0470),
    (1969, -0.0824, -0.0501, 0.0669, 0.0620),
    (1970, 0.0356, 0.1675, 0.0651, 0.0560),
    (1971, 0.1422, 0.0979, 0.0438, 0.0330),
    (1972, 0.1876, 0.0282, 0.0407, 0.0340),
    (1973, -0.1431, 0.0366, 0.0703, 0.0870),
    (1974, -0.2590, 0.0199, 0.0787, 0.1230),
    (1975, 0.3700, 0.0361, 0.0580, 0.0690),
    (1976, 0.2383, 0.1598, 0.0498, 0.0490),
    (1977, -0.0698, 0.0129, 0.0527, 0.0670),
    (1978, 0.0651, -0.0078, 0.0722, 0.0900),
    (1979, 0.1852, 0.0067, 0.1004, 0.1330),
    (1980, 0.3174, -0.0299, 0.1147, 0.1250),
    (1981, -0.0470, 0.0820, 0.1404, 0.0890),
    (1982, 0.2042, 0.3281, 0.1069, 0.0380),
    (1983, 0.2234, 0.0320, 0.0863, 0.0380),
    (1984, 0.0615, 0.1373, 0.0958, 0.0390),
    (1985, 0.3124, 0.2571, 0.0747, 0.0380),
    (1986, 0.1849, 0.2428, 0.0597, 0.0110),
    (1987, 0.0581, -0.0496, 0.0578, 0.0440),
    (1988, 0.1654, 0.0822, 0.0667, 0.0440),
    (1989, 0.3148, 0.1769, 0.0811, 0.0460),
    (1990, -0.0306, 0.0624, 0.0749, 0.0610),
    (1991, 0.3023, 0.1500, 0.0538, 0.0310),
    (1992, 0.0749, 0.0936, 0.0343, 0.0290),
    (1993, 0.0997, 0.1421, 0.0300, 0.0270),
    (1994, 0.0133, -0.0804, 0.0425, 0.0270),
    (1995, 0.3720, 0.2348, 0.0549, 0.0250),
    (1996, 0.2268, 0.0143, 0.0501, 0.0330),
    (1997, 0.3310, 0.0994, 0.0506, 0.0170),
    (1998, 0.2834, 0.1492, 0.0478, 0.0160),
    (1999, 0.2089, -0.0825, 0.0464, 0.0270),
    (2000, -0.0903, 0.1666, 0.0582, 0.0340),
    (2001, -0.1185, 0.0557, 0.0339, 0.0160),
    (2002, -0.2197, 0.1512, 0.0160, 0.0240),
    (2003, 0.2836, 0.0038, 0.0101, 0.0190),
    (2004, 0.1074, 0.0449, 0.0137, 0.0330),
    (2005, 0.0483, 0.0287, 0.0315, 0.0340),
    (2006, 0.1561, 0.0196, 0.0473, 0.0250),
    (2007, 0.0548, 0.1021, 0.0435, 0.0410),
    (2008, -0.3655, 0.2010, 0.0137, 0.0010),
    (2009, 0.2594, -0.1112, 0.0015, 0.0270),
    (2010, 0.1482, 0.0846, 0.0014, 0.0150),
    (2011, 0.0210, 0.1604, 0.0005, 0.0300),
    (2012, 0.1589, 0.0297, 0.0009, 0.0170),
    (2013, 0.3215, -0.0910, 0.0006, 0.0150),
    (2014, 0.1352, 0.1075, 0.0003, 0.0080),
    (2015, 0.0138, 0.0128, 0.0005, 0.0070),
    (2016, 0.1177, 0.0069, 0.0032, 0.0210),
    (2017, 0.2161, 0.0280, 0.0093, 0.0210),
    (2018, -0.0423, -0.0002, 0.0194, 0.0190),
    (2019, 0.3122, 0.0964, 0.0206, 0.0230),
    (2020, 0.1802, 0.1133, 0.0035, 0.0140),
    (2021, 0.2847, -0.0442, 0.0004, 0.0700),
    (2022, -0.1804, -0.1783, 0.0202, 0.0650),
    (2023, 0.2606, 0.0388, 0.0507, 0.0340),
];

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_dataset_span() {
        let dataset = HistoricalDataset::default_us();
        assert_eq!(dataset.len(), 96);
        assert_eq!(dataset.span(), Some((1928, 2023)));
    }

    #[test]
    fn test_blended_return() {
        let year = HistoricalYear {
            year: 1995,
            stocks: 0.372,
            bonds: 0.2348,
            cash: 0.0549,
            inflation: 0.025,
        };
        let blend = year.blended_return(&[0.6, 0.3, 0.1]);
        assert_relative_eq!(blend, 0.6 * 0.372 + 0.3 * 0.2348 + 0.1 * 0.0549, epsilon = 1e-12);
    }

    #[test]
    fn test_known_years() {
        let dataset = HistoricalDataset::default_us();
        let y2008 = dataset
            .years()
            .iter()
            .find(|y| y.year == 2008)
            .expect("2008 present");
        assert!(y2008.stocks < -0.3);
        assert!(y2008.bonds > 0.0);
    }
}
