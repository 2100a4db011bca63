use ridgeline_core::model::{Report, WasteCalculation};
use ridgeline_core::ParsedReport;

pub fn print(parsed: &ParsedReport, with_trace: bool) {
    print_report(&parsed.report);

    if with_trace {
        println!("=== Decisions ===\n");
        for d in &parsed.trace.decisions {
            println!("  {:<14} {}", d.scope.to_string(), d.reason);
        }
        println!();
    }

    if !parsed.trace.warnings.is_empty() {
        for w in &parsed.trace.warnings {
            eprintln!("  warning: {}", w.message);
        }
    }
}

fn print_report(report: &Report) {
    let dash = "-";
    println!("=== Property ===\n");
    println!(
        "  Address:      {}",
        report.property.address.as_deref().unwrap_or(dash)
    );
    if let (Some(lat), Some(lon)) = (report.property.latitude, report.property.longitude) {
        println!("  Location:     {lat}, {lon}");
    }
    let info = &report.report_info;
    println!("  Report:       {}", info.report_number.as_deref().unwrap_or(dash));
    println!("  Date:         {}", info.report_date.as_deref().unwrap_or(dash));
    if let Some(company) = &info.prepared_for_company {
        println!("  Prepared for: {company}");
    }
    println!();

    let roof = &report.roof_measurements;
    println!("=== Roof ===\n");
    println!("  Total area:   {:.0} sq ft", roof.total_area_sqft);
    println!("  Facets:       {}", roof.total_facets);
    println!(
        "  Pitch:        {}",
        roof.predominant_pitch.as_deref().unwrap_or(dash)
    );
    let linear = [
        ("Ridges", roof.ridges_ft),
        ("Hips", roof.hips_ft),
        ("Valleys", roof.valleys_ft),
        ("Rakes", roof.rakes_ft),
        ("Eaves", roof.eaves_ft),
        ("Flashing", roof.flashing_ft),
        ("Step flashing", roof.step_flashing_ft),
        ("Drip edge", roof.drip_edge_ft),
    ];
    for (name, ft) in linear {
        println!("  {:<13} {:>8.0} ft", name, ft);
    }
    println!();

    if !report.pitch_breakdown.is_empty() {
        println!("  {:<8} {:>10} {:>8}", "Pitch", "Area", "%");
        for p in &report.pitch_breakdown {
            println!(
                "  {:<8} {:>10.1} {:>7.1}%",
                p.pitch, p.area_sqft, p.percent_of_roof
            );
        }
        println!();
    }

    print_waste(&report.all_waste_calculations);

    if let Some(walls) = &report.wall_measurements {
        println!("=== Walls ===\n");
        println!("  Wall area:    {:.0} sq ft", walls.total_wall_area_sqft);
        println!("  Facets:       {}", walls.total_wall_facets);
        println!("  Siding:       {:.0} sq ft", walls.total_siding_area_sqft);
        println!("  Masonry:      {:.0} sq ft", walls.total_masonry_area_sqft);
        println!();
    }

    if !report.windows_doors.is_empty() {
        println!("=== Windows & doors ===\n");
        for o in &report.windows_doors {
            println!(
                "  {:<5} {:>6.1} sq ft  {:>5.1} x {:<5.1}  {}",
                o.label, o.area_sqft, o.width_ft, o.height_ft, o.wall_direction
            );
        }
        println!();
    }

    for s in &report.structures {
        println!("--- Structure {} ---\n", s.structure_number);
        println!(
            "  Area {:.0} sq ft, {} facets, pitch {}, {}",
            s.total_area_sqft,
            s.total_facets,
            s.predominant_pitch.as_deref().unwrap_or(dash),
            s.complexity
        );
        println!(
            "  Ridges {:.0}  Hips {:.0}  Valleys {:.0}  Rakes {:.0}  Eaves {:.0}  Drip edge {:.0}",
            s.measurements.ridges_ft,
            s.measurements.hips_ft,
            s.measurements.valleys_ft,
            s.measurements.rakes_ft,
            s.measurements.eaves_ft,
            s.measurements.drip_edge_ft
        );
        println!();
        print_waste(&s.all_waste_calculations);
    }
}

fn print_waste(calculations: &[WasteCalculation]) {
    if calculations.is_empty() {
        return;
    }
    println!("  {:>6} {:>10} {:>8}", "Waste", "Area", "Squares");
    for w in calculations {
        let marker = if w.is_suggested { "  <- suggested" } else { "" };
        println!(
            "  {:>5}% {:>10.0} {:>8.2}{}",
            w.waste_percent, w.area_sqft, w.squares, marker
        );
    }
    println!();
}
