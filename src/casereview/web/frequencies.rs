use flexstr::SharedStr as FlexStr;

use crate::bio::variant::main_gene_id;
use crate::constants::GNOMAD_SV_ID_PREFIX;
use crate::data_types::{PopulationFrequency, SavedVariant};
use crate::web::config::PopulationConfig;

// Format like JavaScript's Number.prototype.toPrecision(): `precision`
// significant digits, rounding exact ties up (0.125 -> "0.13"), switching to
// exponential notation for very small or large exponents.
pub fn to_precision(value: f64, precision: usize) -> String {
    let precision = precision.max(1);

    if value == 0.0 {
        return format!("{:.*}", precision - 1, 0.0);
    }

    if !value.is_finite() {
        return value.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let (digits, exponent) = significant_digits(value.abs(), precision);

    if exponent < -6 || exponent >= precision as i32 {
        let (first, rest) = digits.split_at(1);
        let mantissa =
            if rest.is_empty() {
                first.to_owned()
            } else {
                format!("{}.{}", first, rest)
            };
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        format!("{}{}e{}{}", sign, mantissa, exp_sign, exponent.abs())
    } else if exponent >= 0 {
        let (int_part, frac_part) = digits.split_at(exponent as usize + 1);
        if frac_part.is_empty() {
            format!("{}{}", sign, int_part)
        } else {
            format!("{}{}.{}", sign, int_part, frac_part)
        }
    } else {
        let leading_zeros = "0".repeat((-exponent - 1) as usize);
        format!("{}0.{}{}", sign, leading_zeros, digits)
    }
}

// The first `precision` significant digits of a positive value, rounded half
// up, and the decimal exponent of the first digit.
fn significant_digits(value: f64, precision: usize) -> (String, i32) {
    // Rust rounds ties to even, so format well past the cut off and round
    // the decimal digits here
    let exp_format = format!("{:.*e}", precision + 30, value);
    let (mantissa, exponent) = exp_format.split_once('e').unwrap_or((exp_format.as_str(), "0"));
    let mut exponent = exponent.parse::<i32>().unwrap_or(0);

    let all_digits: Vec<u8> =
        mantissa.bytes().filter(u8::is_ascii_digit).map(|b| b - b'0').collect();

    let mut digits: Vec<u8> = all_digits.iter().take(precision).copied().collect();

    if all_digits.get(precision).is_some_and(|next| *next >= 5) {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == 9 {
                *digit = 0;
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            // 9.99 -> 10.0
            digits.insert(0, 1);
            digits.truncate(precision);
            exponent += 1;
        }
    }

    (digits.iter().map(|digit| char::from(b'0' + digit)).collect(), exponent)
}

// the allele frequency for display, "0.0" if zero
fn af_display(af: f64, precision: usize) -> String {
    if af > 0.0 {
        to_precision(af, precision)
    } else {
        "0.0".into()
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TitleLink {
    pub text: String,
    pub url: String,
    // the last word of the title, shown after the link
    pub detail: String,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct FrequencySummary {
    pub field: FlexStr,
    pub field_title: FlexStr,
    #[serde(skip_serializing_if="Option::is_none")]
    pub title_link: Option<TitleLink>,
    // " heteroplasmy" or " homoplasmy" for mitochondrial variants
    #[serde(skip_serializing_if="Option::is_none")]
    pub plasmy_suffix: Option<&'static str>,
    // the population ID if present, otherwise the formatted AF
    pub value: String,
    // the formatted filtered AF if non-zero, otherwise the formatted AF
    pub display_value: String,
    #[serde(skip_serializing_if="Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub hom: Option<u64>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub het: Option<u64>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub hemi: Option<u64>,
    // eg. "AC=3 out of 1000"
    #[serde(skip_serializing_if="Option::is_none")]
    pub allele_counts: Option<String>,
}

struct LinkCoords<'a> {
    chrom: &'a str,
    pos: i64,
    genome_version: &'a str,
}

// use the lifted over coordinates if the site has no URL for the variant's
// own genome version
fn link_coords<'a>(variant: &'a SavedVariant, pop_config: &PopulationConfig)
    -> Option<LinkCoords<'a>>
{
    let genome_version = variant.genome_version.as_deref().unwrap_or("");

    if pop_config.urls.contains_key(genome_version) {
        return Some(LinkCoords {
            chrom: &variant.chrom,
            pos: variant.pos,
            genome_version,
        });
    }

    let lifted_over_version = variant.lifted_over_genome_version.as_deref()?;

    if pop_config.urls.contains_key(lifted_over_version) {
        Some(LinkCoords {
            chrom: variant.lifted_over_chrom.as_deref().unwrap_or(&variant.chrom),
            pos: variant.lifted_over_pos.unwrap_or(variant.pos),
            genome_version: lifted_over_version,
        })
    } else {
        None
    }
}

fn site_url(pop_config: &PopulationConfig, genome_version: &str, path: &str) -> Option<String> {
    let url = pop_config.urls.get(genome_version)?;
    let query_string =
        pop_config.query_params.get(genome_version)
        .map(|query| format!("?{}", query))
        .unwrap_or_default();

    Some(format!("http://{}/{}{}", url, path, query_string))
}

// A link to a variant or, for zero frequencies, to the surrounding region.
// Values that aren't numbers (population IDs) are used as the path as is.
fn freq_link_path(coords: &LinkCoords, variant: &SavedVariant, value: &str) -> String {
    match value.parse::<f64>() {
        Err(_) => format!("variant/{}", value),
        Ok(float_value) if float_value <= 0.0 => {
            let end_offset = variant.end.map(|end| end - variant.pos).unwrap_or(0);
            format!("region/{}-{}-{}", coords.chrom, (coords.pos - 100).max(1),
                    coords.pos + end_offset + 100)
        },
        Ok(_) => {
            format!("variant/{}-{}-{}-{}", coords.chrom, coords.pos,
                    variant.reference.as_deref().unwrap_or(""),
                    variant.alt.as_deref().unwrap_or(""))
        },
    }
}

fn title_link(variant: &SavedVariant, pop_config: &PopulationConfig) -> Option<TitleLink> {
    if !pop_config.gene_title_link {
        return None;
    }

    let coords = link_coords(variant, pop_config)?;
    let gene_id = main_gene_id(variant).unwrap_or_default();
    let url = site_url(pop_config, coords.genome_version, &format!("gene/{}", gene_id))?;

    let mut words: Vec<&str> = pop_config.field_title.split(' ').collect();
    let detail = words.pop().unwrap_or("").to_owned();

    Some(TitleLink {
        text: words.join(" "),
        url,
        detail,
    })
}

// The summary of one population, or None if the population has no allele
// frequency.  A frequency of zero is still summarised.
pub fn frequency_summary(variant: &SavedVariant, pop_config: &PopulationConfig, is_mito: bool)
    -> Option<FrequencySummary>
{
    let population = variant.populations.get(&pop_config.field)?;
    let af = population.af?;
    let precision = pop_config.precision();

    let af_value = af_display(af, precision);
    let value =
        match population.id {
            Some(ref id) => id.replace(GNOMAD_SV_ID_PREFIX, ""),
            None => af_value.clone(),
        };
    let display_value =
        match population.filter_af {
            Some(filter_af) if filter_af > 0.0 => to_precision(filter_af, precision),
            _ => af_value,
        };

    let link =
        link_coords(variant, pop_config)
        .and_then(|coords| {
            let path = freq_link_path(&coords, variant, &value);
            site_url(pop_config, coords.genome_version, &path)
        });

    let plasmy_suffix =
        if is_mito {
            Some(if pop_config.is_het { " heteroplasmy" } else { " homoplasmy" })
        } else {
            None
        };

    let allele_counts =
        match (&pop_config.ac_display, population.ac) {
            (Some(ac_display), Some(ac)) => {
                match population.an {
                    Some(an) => Some(format!("{}={} out of {}", ac_display, ac, an)),
                    None => Some(format!("{}={}", ac_display, ac)),
                }
            },
            _ => None,
        };

    Some(FrequencySummary {
        field: pop_config.field.clone(),
        field_title: pop_config.field_title.clone(),
        title_link: title_link(variant, pop_config),
        plasmy_suffix,
        value,
        display_value,
        link,
        hom: population.hom,
        het: population.het,
        hemi: if variant.chrom.ends_with('X') { population.hemi } else { None },
        allele_counts,
    })
}

#[derive(Serialize, Clone, Debug, PartialEq, Default)]
pub struct FrequencyDetails {
    pub is_mito: bool,
    pub summaries: Vec<FrequencySummary>,
    // populations where the filtered AF differs from the AF
    pub global_afs: Vec<String>,
    // "Homoplasmy" for mitochondrial variants, otherwise "Allele Counts"
    pub allele_counts_header: &'static str,
    pub allele_counts: Vec<String>,
    pub heteroplasmy: Vec<String>,
    pub help_messages: Vec<FlexStr>,
}

impl FrequencyDetails {
    // true if there is anything to show beyond the summaries
    pub fn has_details(&self) -> bool {
        !self.global_afs.is_empty() || !self.allele_counts.is_empty() ||
            !self.heteroplasmy.is_empty() || !self.help_messages.is_empty()
    }
}

fn population<'a>(variant: &'a SavedVariant, pop_config: &PopulationConfig)
    -> Option<&'a PopulationFrequency>
{
    variant.populations.get(&pop_config.field)
}

fn is_nonzero_count(count: Option<u64>) -> bool {
    count.is_some_and(|count| count > 0)
}

fn ac_line(pop_config: &PopulationConfig, population: &PopulationFrequency) -> String {
    let an = population.an.map(|an| an.to_string()).unwrap_or_else(|| "?".into());
    format!("{}: {} out of {}", pop_config.field_title, population.ac.unwrap_or(0), an)
}

// a variant is mitochondrial if any heteroplasmy population has an AF
pub fn is_mito(variant: &SavedVariant, populations: &[PopulationConfig]) -> bool {
    populations.iter()
        .filter(|pop_config| pop_config.is_het)
        .any(|pop_config| population(variant, pop_config).is_some_and(|pop| pop.af.is_some()))
}

pub fn frequency_details(variant: &SavedVariant, populations: &[PopulationConfig])
    -> FrequencyDetails
{
    let is_mito = is_mito(variant, populations);

    let summaries =
        populations.iter()
        .filter_map(|pop_config| frequency_summary(variant, pop_config, is_mito))
        .collect();

    let mut details = FrequencyDetails {
        is_mito,
        summaries,
        allele_counts_header: if is_mito { "Homoplasmy" } else { "Allele Counts" },
        ..FrequencyDetails::default()
    };

    for pop_config in populations {
        let Some(population) = population(variant, pop_config)
        else {
            continue;
        };
        let precision = pop_config.precision();

        if let (Some(filter_af), Some(af)) = (population.filter_af, population.af)
            && filter_af != 0.0 && filter_af != af {
                details.global_afs.push(format!("{}: {}", pop_config.field_title,
                                                to_precision(af, precision)));
            }

        if is_nonzero_count(population.ac) {
            if pop_config.is_het {
                details.heteroplasmy.push(ac_line(pop_config, population));
            } else {
                details.allele_counts.push(ac_line(pop_config, population));
            }
        }
    }

    for pop_config in populations {
        if let Some(max_hl) = population(variant, pop_config).and_then(|pop| pop.max_hl)
            && max_hl != 0.0 {
                details.heteroplasmy.push(format!("{} max observed heteroplasmy: {}",
                                                  pop_config.field_title,
                                                  to_precision(max_hl, pop_config.precision())));
            }
    }

    details.help_messages =
        populations.iter()
        .filter(|pop_config| population(variant, pop_config).is_some_and(|pop| pop.af.is_some()))
        .filter_map(|pop_config| pop_config.help_message.clone())
        .collect();

    details
}

#[test]
fn test_to_precision() {
    assert_eq!(to_precision(0.123456, 2), "0.12");
    assert_eq!(to_precision(0.000123456, 3), "0.000123");
    assert_eq!(to_precision(0.0000001234, 2), "1.2e-7");
    assert_eq!(to_precision(0.5, 3), "0.500");
    assert_eq!(to_precision(0.0999, 2), "0.10");
    assert_eq!(to_precision(123.0, 2), "1.2e+2");
    assert_eq!(to_precision(0.0, 2), "0.0");
    assert_eq!(to_precision(1.0, 2), "1.0");
    assert_eq!(to_precision(9.96, 2), "10");
    assert_eq!(to_precision(-0.0123, 2), "-0.012");
}

#[test]
fn test_to_precision_ties() {
    // exact binary ties round up
    assert_eq!(to_precision(0.125, 2), "0.13");
    assert_eq!(to_precision(0.625, 2), "0.63");
    assert_eq!(to_precision(0.875, 2), "0.88");
    assert_eq!(to_precision(0.0625, 3), "0.0625");
    assert_eq!(to_precision(0.0625, 2), "0.063");
    // 0.145 is stored just below the tie
    assert_eq!(to_precision(0.145, 2), "0.14");
}

#[test]
fn test_af_display() {
    assert_eq!(af_display(0.0, 2), "0.0");
    assert_eq!(af_display(0.0, 3), "0.0");
    assert_eq!(af_display(0.25, 3), "0.250");
}
