//! Feed bodies shaped like the real IANA and Public Suffix List files

/// Excerpt of `tlds-alpha-by-domain.txt`
pub const IANA_BODY: &str = "# Version 2024061300, Last Updated Thu Jun 13 07:07:01 2024 UTC
AAA
ABB
COM
NET
ORG
XN--11B4C3D
XN--P1AI
ZW
";

/// Excerpt of `effective_tld_names.dat`
pub const PSL_BODY: &str = "// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// ===BEGIN ICANN DOMAINS===

// ac : http://nic.ac/rules.htm
ac
com.ac
edu.ac

// ck : https://en.wikipedia.org/wiki/.ck
*.ck
!www.ck

com
net
xn--p1ai
рф
// ===END ICANN DOMAINS===
";

/// TLDs expected from merging [`IANA_BODY`] and [`PSL_BODY`]
pub const MERGED_TLDS: &[&str] = &["aaa", "abb", "ac", "com", "net", "org", "zw", "рф"];
