use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mimizuku_engine::{ClassId, Classifier, NormalizedAxiom, Ontology, RoleId};

fn create_chain_ontology(size: u32) -> Ontology {
    let mut ontology = Ontology::new();

    // deep subsumption chain: Class(i) ⊑ Class(i - 1)
    for i in 1..size {
        ontology.add_axiom(NormalizedAxiom::SubClassOf(
            ClassId(ClassId::FIRST_NAMED + i),
            ClassId(ClassId::FIRST_NAMED + i - 1),
        ));
    }

    ontology
}

fn create_existential_ontology(size: u32) -> Ontology {
    let mut ontology = Ontology::new();
    let role = RoleId(2);
    ontology.add_axiom(NormalizedAxiom::SubRoleOfComposition(role, role, role));

    // existential chain with a propagation axiom on every level
    for i in 0..size {
        let here = ClassId(ClassId::FIRST_NAMED + 2 * i);
        let filler = ClassId(ClassId::FIRST_NAMED + 2 * i + 1);
        ontology.add_axiom(NormalizedAxiom::SubClassOfExistential(here, role, filler));
        ontology.add_axiom(NormalizedAxiom::ExistentialSubClassOf(role, filler, here));
    }

    ontology
}

fn benchmark_chain_classification(c: &mut Criterion) {
    let ontology = create_chain_ontology(200);
    c.bench_function("classify_chain_200", |b| {
        b.iter(|| {
            let classification = Classifier::new().classify(black_box(&ontology)).unwrap();
            black_box(classification.ancestors(ClassId(ClassId::FIRST_NAMED + 199)));
        })
    });
}

fn benchmark_existential_classification(c: &mut Criterion) {
    let ontology = create_existential_ontology(50);
    c.bench_function("classify_existential_50", |b| {
        b.iter(|| {
            let classification = Classifier::new().classify(black_box(&ontology)).unwrap();
            black_box(classification.descendants(ClassId::TOP));
        })
    });
}

criterion_group!(
    benches,
    benchmark_chain_classification,
    benchmark_existential_classification
);
criterion_main!(benches);
