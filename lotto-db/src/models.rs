use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MAX_NUMBER: u8 = 45;
pub const PICK_COUNT: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    pub round: u32,
    pub date: Option<NaiveDate>,
    pub numbers: [u8; PICK_COUNT],
    pub bonus: Option<u8>,
}

impl Draw {
    pub fn new(round: u32, numbers: [u8; PICK_COUNT], bonus: Option<u8>) -> Result<Self> {
        validate_draw(round, &numbers, bonus)?;
        Ok(Self {
            round,
            date: None,
            numbers,
            bonus,
        })
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers.contains(&number)
    }
}

/// One record as served by the results API (`drwNo`, `drwtNo1..6`, `bnusNo`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDraw {
    pub drw_no: u32,
    #[serde(default)]
    pub drw_no_date: Option<String>,
    pub drwt_no1: u8,
    pub drwt_no2: u8,
    pub drwt_no3: u8,
    pub drwt_no4: u8,
    pub drwt_no5: u8,
    pub drwt_no6: u8,
    #[serde(default)]
    pub bnus_no: Option<u8>,
    #[serde(default)]
    pub return_value: Option<String>,
}

impl TryFrom<ApiDraw> for Draw {
    type Error = anyhow::Error;

    fn try_from(api: ApiDraw) -> Result<Self> {
        if api.return_value.as_deref() == Some("fail") {
            bail!("Round {} is not available (returnValue=fail)", api.drw_no);
        }

        let numbers = [
            api.drwt_no1,
            api.drwt_no2,
            api.drwt_no3,
            api.drwt_no4,
            api.drwt_no5,
            api.drwt_no6,
        ];
        validate_draw(api.drw_no, &numbers, api.bnus_no)?;

        let date = api
            .drw_no_date
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .with_context(|| format!("Invalid draw date '{}' (round {})", s, api.drw_no))
            })
            .transpose()?;

        Ok(Draw {
            round: api.drw_no,
            date,
            numbers,
            bonus: api.bnus_no,
        })
    }
}

pub fn validate_draw(round: u32, numbers: &[u8; PICK_COUNT], bonus: Option<u8>) -> Result<()> {
    if round == 0 {
        bail!("Round number must start at 1");
    }
    for &n in numbers {
        if n < 1 || n > MAX_NUMBER {
            bail!("Number {} out of range (1-{})", n, MAX_NUMBER);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Duplicate number: {}", numbers[i]);
            }
        }
    }
    if let Some(b) = bonus {
        if b < 1 || b > MAX_NUMBER {
            bail!("Bonus {} out of range (1-{})", b, MAX_NUMBER);
        }
    }
    Ok(())
}
