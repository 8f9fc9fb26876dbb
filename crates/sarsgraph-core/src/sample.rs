//! Sample SARS-CoV-2 graph
//!
//! One node per domain, each tagged with the intent it answers, four
//! literature-backed edges, two hypothesis paths, two exploration sessions
//! and two measured rate-distortion curves. The CLI `demo` command exports
//! it and the workspace tests use it as their shared fixture.

use crate::builder::GraphBuilder;
use crate::domain::Domain;
use crate::edge::builders;
use crate::error::Result;
use crate::graph::Graph;
use crate::hypothesis::HypothesisPath;
use crate::node::{DomainNode, NodeAttrs, RootEntity};
use crate::rd::RateDistortionCurve;
use crate::trace::{HypothesisType, SerendipityTrace};

const DOI_BA5_ESCAPE: &str = "doi:10.1038/s41586-022-04980-y";
const DOI_PAXLOVID: &str = "doi:10.1056/NEJMoa2118542";
const DOI_BA5_SPIKE: &str = "doi:10.1016/j.cell.2022.06.005";
const DOI_MASKS: &str = "doi:10.1073/pnas.2015954118";

/// Session exploring how Omicron BA.5 changes vaccine efficacy and spread
pub fn omicron_ba5_trace() -> Result<SerendipityTrace> {
    let mut trace = SerendipityTrace::new(
        "session-001",
        "How does Omicron BA.5 affect vaccine efficacy and transmissibility?",
    );
    trace.add_step(
        HypothesisType::Transmissibility,
        "Omicron BA.5 transmissibility mutations",
        [Domain::Genomics, Domain::Virology],
        12,
        0.85,
    )?;
    trace.add_step(
        HypothesisType::VaccineEfficacy,
        "BA.5 spike mutations vaccine escape",
        [Domain::Immunology, Domain::Genomics],
        8,
        0.72,
    )?;
    trace.add_step(
        HypothesisType::ImmuneEscape,
        "BA.5 antibody neutralization resistance",
        [Domain::Immunology],
        15,
        0.88,
    )?;
    trace.add_step(
        HypothesisType::PublicHealthImpact,
        "BA.5 breakthrough infections policy response",
        [Domain::PublicHealth, Domain::Immunology],
        6,
        0.65,
    )?;
    Ok(trace)
}

/// Session following Paxlovid across variants
pub fn paxlovid_trace() -> Result<SerendipityTrace> {
    let mut trace = SerendipityTrace::new(
        "session-002",
        "What is Paxlovid's effectiveness against different variants?",
    );
    let steps = [
        ("Paxlovid mechanism protease inhibition", Domain::Virology, 10, 0.90),
        ("Paxlovid efficacy Delta variant", Domain::Genomics, 7, 0.82),
        ("Paxlovid efficacy Omicron variants", Domain::Genomics, 9, 0.78),
    ];
    for (description, domain, evidence, confidence) in steps {
        trace.add_step(
            HypothesisType::TreatmentResponse,
            description,
            [Domain::Treatment, domain],
            evidence,
            confidence,
        )?;
    }
    Ok(trace)
}

/// Build the sample graph
pub fn sample_graph() -> Result<Graph> {
    let mut builder = GraphBuilder::new(RootEntity::new("SARS-CoV-2", 29.9)?);

    builder.add_node(DomainNode::virology(
        "spike",
        NodeAttrs::new("Spike protein", 15, 0.92)
            .with_intent("transmissibility")
            .with_sources([DOI_BA5_SPIKE]),
        "Spike protein S1/S2 structure",
        "RBD binds ACE2 receptor with high affinity",
    )?)?;
    builder.add_node(DomainNode::immunology(
        "nab",
        NodeAttrs::new("Neutralizing antibodies", 12, 0.85)
            .with_intent("vaccine_efficacy")
            .with_sources([DOI_BA5_ESCAPE]),
        "Neutralizing antibody response",
        "IgG antibodies target RBD and NTD regions",
    )?)?;
    builder.add_node(DomainNode::genomics(
        "ba5",
        NodeAttrs::new("Omicron BA.5", 18, 0.88)
            .with_intent("immune_escape")
            .with_sources([DOI_BA5_ESCAPE, DOI_BA5_SPIKE]),
        "Omicron BA.5",
        ["L452R", "F486V", "R493Q"],
    )?)?;
    builder.add_node(DomainNode::treatment(
        "paxlovid",
        NodeAttrs::new("Paxlovid", 10, 0.90)
            .with_intent("treatment_efficacy")
            .with_sources([DOI_PAXLOVID]),
        "Paxlovid (nirmatrelvir/ritonavir)",
        "3CL protease inhibitor",
    )?)?;
    builder.add_node(DomainNode::public_health(
        "masks",
        NodeAttrs::new("Indoor mask mandates", 8, 0.75)
            .with_intent("transmission_reduction")
            .with_sources([DOI_MASKS]),
        "Indoor mask mandates",
        "Reduced transmission by 20-30% in controlled studies",
    )?)?;

    let escape = builder.add_edge(builders::mutation_to_immune_escape(
        "ba5",
        "nab",
        "BA.5 mutations",
        vec![DOI_BA5_ESCAPE.into()],
        0.85,
    ))?;
    builder.add_edge(builders::treatment_to_outcome(
        "paxlovid",
        "masks",
        "Paxlovid",
        vec![DOI_PAXLOVID.into()],
        0.89,
    ))?;
    let spread = builder.add_edge(builders::variant_to_transmissibility(
        "ba5",
        "spike",
        "Omicron BA.5",
        vec![DOI_BA5_SPIKE.into()],
        0.91,
    ))?;
    builder.add_edge(builders::policy_to_transmission(
        "masks",
        "spike",
        "Mask mandates",
        vec![DOI_MASKS.into()],
        0.72,
    ))?;

    builder.add_hypothesis_path(HypothesisPath::new(
        HypothesisType::Transmissibility,
        "BA.5 mutations increase transmissibility via enhanced ACE2 binding",
        ["ba5", "spike"],
        [spread],
        0.91,
        0.88,
    )?)?;
    builder.add_hypothesis_path(HypothesisPath::new(
        HypothesisType::VaccineEfficacy,
        "BA.5 mutations reduce vaccine efficacy through antibody escape",
        ["ba5", "nab"],
        [escape],
        0.85,
        0.82,
    )?)?;

    builder.add_trace(omicron_ba5_trace()?)?;
    builder.add_trace(paxlovid_trace()?)?;

    builder.add_rd_curve(
        "transmissibility",
        RateDistortionCurve::from_measurements(&[5, 10, 15, 20, 25], &[0.8, 0.5, 0.3, 0.2, 0.15])?,
    )?;
    builder.add_rd_curve(
        "vaccine_efficacy",
        RateDistortionCurve::from_measurements(&[3, 8, 12, 18, 22], &[0.9, 0.6, 0.4, 0.25, 0.18])?,
    )?;

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_graph_covers_every_domain_and_intent() {
        let graph = sample_graph().unwrap();
        let stats = graph.statistics();
        assert_eq!(stats.domains_covered, 5);
        assert_eq!(stats.cross_domain_edges, 4);
        assert_eq!(stats.nodes_per_intent.len(), 5);
        assert_eq!(stats.hypothesis_paths, 2);
        assert_eq!(graph.traces().len(), 2);
        assert_eq!(graph.rd_curves().len(), 2);

        let spread: Vec<_> = graph
            .hypothesis_paths_for(HypothesisType::Transmissibility)
            .collect();
        assert_eq!(spread.len(), 1);
        assert_eq!(spread[0].node_sequence()[1].as_str(), "spike");
        assert_eq!(graph.nodes_for_intent("immune_escape").count(), 1);
    }
}
