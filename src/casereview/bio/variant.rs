use crate::data_types::{SavedVariant, Transcript};
use crate::types::{GeneId, VariantUniqueId};

// The coordinates needed to identify a variant.  SNVs/indels have ref and alt,
// structural variants have an end position instead.
pub trait VariantCoords {
    fn chrom(&self) -> Option<&str>;
    fn pos(&self) -> Option<i64>;
    fn reference(&self) -> Option<&str>;
    fn alt(&self) -> Option<&str>;
    fn end(&self) -> Option<i64>;
}

impl VariantCoords for SavedVariant {
    fn chrom(&self) -> Option<&str> {
        Some(self.chrom.as_str())
    }
    fn pos(&self) -> Option<i64> {
        Some(self.pos)
    }
    fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }
    fn alt(&self) -> Option<&str> {
        self.alt.as_deref()
    }
    fn end(&self) -> Option<i64> {
        self.end
    }
}

impl VariantCoords for crate::data_types::MmeGeneVariant {
    fn chrom(&self) -> Option<&str> {
        self.chrom.as_deref()
    }
    fn pos(&self) -> Option<i64> {
        self.pos
    }
    fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }
    fn alt(&self) -> Option<&str> {
        self.alt.as_deref()
    }
    fn end(&self) -> Option<i64> {
        self.end
    }
}

fn opt_display<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "undefined".into())
}

// "chrom-pos-ref-alt-geneId", or "chrom-pos-end-geneId" when there is no ref
// allele.  Missing parts are written as "undefined" so that IDs stay
// identical to the ones computed by other clients.
pub fn variant_unique_id(variant: &dyn VariantCoords, gene_id: Option<&str>) -> VariantUniqueId {
    let alleles_or_end =
        match variant.reference().filter(|reference| !reference.is_empty()) {
            Some(reference) => format!("{}-{}", reference, opt_display(variant.alt())),
            None => opt_display(variant.end()),
        };

    format!("{}-{}-{}-{}", opt_display(variant.chrom()), opt_display(variant.pos()),
            alleles_or_end, opt_display(gene_id))
}

// the same coordinates and alleles (or end for SVs)
pub fn same_variant(variant1: &dyn VariantCoords, variant2: &dyn VariantCoords) -> bool {
    if variant1.chrom() != variant2.chrom() || variant1.pos() != variant2.pos() {
        return false;
    }

    if variant1.reference().is_some_and(|r| !r.is_empty()) {
        variant1.reference() == variant2.reference() && variant1.alt() == variant2.alt()
    } else {
        variant1.end() == variant2.end()
    }
}

// the transcript with ID mainTranscriptId, if any
pub fn main_transcript(variant: &SavedVariant) -> Option<&Transcript> {
    let main_transcript_id = variant.main_transcript_id.as_ref()?;

    variant.transcripts.values().flatten()
        .find(|transcript| transcript.transcript_id.as_ref() == Some(main_transcript_id))
}

pub fn main_gene_id(variant: &SavedVariant) -> Option<GeneId> {
    main_transcript(variant)
        .and_then(|transcript| transcript.gene_id.clone())
        .or_else(|| variant.transcripts.keys().next().cloned())
        .or_else(|| variant.gene_id.clone())
}

pub fn is_sv(variant: &SavedVariant) -> bool {
    variant.sv_type.as_ref().is_some_and(|sv_type| !sv_type.is_empty())
}

#[cfg(test)]
fn make_variant(reference: Option<&str>, alt: Option<&str>, end: Option<i64>) -> SavedVariant {
    SavedVariant {
        variant_guid: "SV0001".into(),
        family_guids: vec![],
        chrom: "1".into(),
        pos: 1000,
        reference: reference.map(|r| r.into()),
        alt: alt.map(|a| a.into()),
        end,
        gene_id: None,
        genome_version: None,
        sv_type: None,
        transcripts: Default::default(),
        main_transcript_id: None,
        genotypes: Default::default(),
        populations: Default::default(),
        tag_guids: vec![],
        note_guids: vec![],
        lifted_over_genome_version: None,
        lifted_over_chrom: None,
        lifted_over_pos: None,
    }
}

#[test]
fn test_variant_unique_id() {
    let snv = make_variant(Some("A"), Some("T"), None);
    assert_eq!(variant_unique_id(&snv, Some("ENSG00001")), "1-1000-A-T-ENSG00001");
    assert_ne!(variant_unique_id(&snv, Some("ENSG00001")),
               variant_unique_id(&snv, Some("ENSG00002")));

    let sv = make_variant(None, None, Some(5000));
    assert_eq!(variant_unique_id(&sv, Some("ENSG00001")), "1-1000-5000-ENSG00001");
}

#[test]
fn test_same_variant() {
    let snv1 = make_variant(Some("A"), Some("T"), None);
    let snv2 = make_variant(Some("A"), Some("G"), None);
    assert!(same_variant(&snv1, &snv1.clone()));
    assert!(!same_variant(&snv1, &snv2));

    let sv1 = make_variant(None, None, Some(5000));
    let sv2 = make_variant(None, None, Some(6000));
    assert!(same_variant(&sv1, &sv1.clone()));
    assert!(!same_variant(&sv1, &sv2));
}
