//! Load payment tranches from CSV (`name,payment_month,amount_percent[,phase]`)

use super::{PaymentTranche, Phase};
use csv::Reader;
use std::error::Error;
use std::path::Path;

/// Raw CSV row; the phase column is optional and defaults to equipment
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    name: String,
    payment_month: u32,
    amount_percent: f64,
    #[serde(default)]
    phase: Option<String>,
}

impl CsvRow {
    fn into_tranche(self) -> Result<PaymentTranche, Box<dyn Error>> {
        let phase = match self.phase.as_deref().map(str::trim) {
            None | Some("") => Phase::default(),
            Some(raw) => raw.parse::<Phase>()?,
        };

        if !(0.0..=100.0).contains(&self.amount_percent) {
            return Err(format!(
                "tranche '{}' amount must be within 0..=100 percent, got {}",
                self.name, self.amount_percent
            )
            .into());
        }

        Ok(PaymentTranche::new(self.name.trim(), self.payment_month, self.amount_percent, phase))
    }
}

/// Load all tranches from a CSV file
pub fn load_tranches<P: AsRef<Path>>(path: P) -> Result<Vec<PaymentTranche>, Box<dyn Error>> {
    let reader = Reader::from_path(path)?;
    collect_tranches(reader)
}

/// Load tranches from any reader (e.g., string buffer, request body)
pub fn load_tranches_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<PaymentTranche>, Box<dyn Error>> {
    collect_tranches(Reader::from_reader(reader))
}

fn collect_tranches<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<PaymentTranche>, Box<dyn Error>> {
    let mut tranches = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        tranches.push(row.into_tranche()?);
    }
    Ok(tranches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_tranches_from_reader() {
        let data = "name,payment_month,amount_percent,phase\n\
                    Down payment,0,15,\n\
                    Delivery,14,70,equipment\n\
                    Erection complete,24,10,Erection\n";
        let tranches = load_tranches_from_reader(data.as_bytes()).unwrap();

        assert_eq!(tranches.len(), 3);
        assert!(tranches[0].is_down_payment());
        assert_eq!(tranches[0].phase, Phase::Equipment);
        assert_eq!(tranches[1].payment_month, 14);
        assert_eq!(tranches[2].phase, Phase::Erection);
    }

    #[test]
    fn test_phase_column_optional() {
        let data = "name,payment_month,amount_percent\nDelivery,10,85\n";
        let tranches = load_tranches_from_reader(data.as_bytes()).unwrap();
        assert_eq!(tranches[0].phase, Phase::Equipment);
    }

    #[test]
    fn test_rejects_bad_rows() {
        let unknown_phase = "name,payment_month,amount_percent,phase\nDelivery,10,85,shipping\n";
        assert!(load_tranches_from_reader(unknown_phase.as_bytes()).is_err());

        let too_large = "name,payment_month,amount_percent\nDelivery,10,185\n";
        assert!(load_tranches_from_reader(too_large.as_bytes()).is_err());
    }
}
